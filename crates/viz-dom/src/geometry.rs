//! Geometry: rectangles, coordinate pairs, and the position/offset helpers.
//!
//! Layout is an external collaborator. It writes `ElementGeometry` onto
//! elements and scroll offsets onto the document; the helpers here only
//! read those values back.

use crate::operations::{DomError, DomResult};
use crate::{Document, NodeId};

/// Rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }
}

/// Top/left coordinate pair returned by the geometry helpers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub top: f64,
    pub left: f64,
}

/// Element geometry state, written by layout
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementGeometry {
    /// Offset-parent-relative position
    pub offset_top: f64,
    pub offset_left: f64,
    /// Reference frame for offset_top/offset_left
    pub offset_parent: Option<NodeId>,
    /// Client offsets of this element's box (border widths)
    pub client_top: f64,
    pub client_left: f64,
    /// Viewport-relative bounding rectangle
    pub rect: Rect,
}

impl ElementGeometry {
    /// Viewport-relative bounding rectangle as last written by layout
    pub fn bounding_client_rect(&self) -> Rect {
        self.rect
    }
}

/// Offset-parent-relative top/left of a node, as computed by layout.
/// Not scroll-adjusted.
pub fn position(doc: &Document, node: NodeId) -> DomResult<Point> {
    let geometry = element_geometry(doc, node)?;
    Ok(Point {
        top: geometry.offset_top,
        left: geometry.offset_left,
    })
}

/// Page-absolute top/left of a node: the bounding rectangle adjusted by the
/// current page scroll and the document element's own client offset.
pub fn offset(doc: &Document, node: NodeId) -> DomResult<Point> {
    let rect = element_geometry(doc, node)?.rect;
    let root = element_geometry(doc, doc.document_element())?;
    Ok(Point {
        top: rect.top() + doc.page_y_offset() - root.client_top,
        left: rect.left() + doc.page_x_offset() - root.client_left,
    })
}

fn element_geometry(doc: &Document, node: NodeId) -> DomResult<ElementGeometry> {
    let node_ref = doc.tree().get(node).ok_or(DomError::NotFound(node))?;
    node_ref
        .as_element()
        .map(|elem| elem.geometry)
        .ok_or(DomError::NotAnElement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attrs, div};

    #[test]
    fn test_rect_edges() {
        let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
    }

    #[test]
    fn test_position_reads_layout_offsets() {
        let mut doc = Document::new();
        let node = div(&mut doc, Attrs::new(), Vec::new()).unwrap();

        let elem = doc.tree_mut().element_mut(node).unwrap();
        elem.geometry.offset_top = 40.0;
        elem.geometry.offset_left = 15.0;

        assert_eq!(
            position(&doc, node).unwrap(),
            Point {
                top: 40.0,
                left: 15.0
            }
        );
    }

    #[test]
    fn test_offset_relationship_with_position() {
        // For a node whose offset parent is the document element:
        // offset = position + page scroll - root client offset
        let mut doc = Document::new();
        let root = doc.document_element();
        let node = div(&mut doc, Attrs::new(), Vec::new()).unwrap();

        let elem = doc.tree_mut().element_mut(node).unwrap();
        elem.geometry.offset_top = 100.0;
        elem.geometry.offset_left = 30.0;
        elem.geometry.offset_parent = Some(root);
        elem.geometry.rect = Rect::from_xywh(30.0, 100.0, 50.0, 20.0);

        let root_elem = doc.tree_mut().element_mut(root).unwrap();
        root_elem.geometry.client_top = 2.0;
        root_elem.geometry.client_left = 4.0;

        doc.set_page_offset(7.0, 250.0);

        let pos = position(&doc, node).unwrap();
        let off = offset(&doc, node).unwrap();
        assert_eq!(off.top, pos.top + 250.0 - 2.0);
        assert_eq!(off.left, pos.left + 7.0 - 4.0);
    }

    #[test]
    fn test_offset_rejects_non_elements() {
        let mut doc = Document::new();
        let text = doc.tree_mut().create_text("hello");

        assert_eq!(offset(&doc, text), Err(DomError::NotAnElement));
        assert!(matches!(
            position(&doc, NodeId(9999)),
            Err(DomError::NotFound(_))
        ));
    }
}

use sticky_core::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The pointer left the receiver's bounds.
    Exit,
}

/// Pointer event in the receiver's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// The same event translated into a child space whose origin is `origin`.
    pub fn relative_to(self, origin: Point) -> Self {
        Self {
            kind: self.kind,
            position: self.position.relative_to(origin),
        }
    }
}

//! Canonical kind boxes.
//!
//! Every built-in value carries its kind in its `components` variable. The
//! kind boxes themselves are process-wide singletons, so identity comparison
//! against them is how a value's kind is recognised.

use once_cell::sync::Lazy;

use super::Box;

/// The built-in kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Real,
    String,
    List,
    Dictionary,
}

static KIND_BOXES: Lazy<[Box; 7]> = Lazy::new(|| {
    [
        Box::new(),
        Box::new(),
        Box::new(),
        Box::new(),
        Box::new(),
        Box::new(),
        Box::new(),
    ]
});

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Null,
        Kind::Boolean,
        Kind::Integer,
        Kind::Real,
        Kind::String,
        Kind::List,
        Kind::Dictionary,
    ];

    /// The canonical box for this kind. Always the same box.
    pub fn boxed(self) -> Box {
        KIND_BOXES[self as usize].clone()
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "Null",
            Kind::Boolean => "Boolean",
            Kind::Integer => "Integer",
            Kind::Real => "Real",
            Kind::String => "String",
            Kind::List => "List",
            Kind::Dictionary => "Dictionary",
        }
    }

    /// Returns the kind whose canonical box is `value`, if any.
    pub fn of_kind_box(value: &Box) -> Option<Kind> {
        Kind::ALL
            .into_iter()
            .find(|kind| Box::ptr_eq(&KIND_BOXES[*kind as usize], value))
    }
}

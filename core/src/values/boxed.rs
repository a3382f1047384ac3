use core::fmt;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;

use super::{BoxMethod, Kind};
use crate::evaluator::EvalError;

/// Variable holding the "is-a" list of a box.
pub const COMPONENTS: &str = "components";
/// Variable naming the box a method lookup is delegated to.
pub const CALL: &str = "call";

/// Native payload of a built-in value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxData {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(Vec<u8>),
    List(Vec<Box>),
    Dictionary(Vec<(Box, Box)>),
}

struct BoxInner {
    variables: RwLock<HashMap<String, Box>>,
    method: BoxMethod,
    data: Option<BoxData>,
}

impl BoxInner {
    /// Moves every box this one holds into `pending`.
    fn detach_children(&mut self, pending: &mut Vec<Box>) {
        pending.extend(self.variables.get_mut().drain().map(|(_, value)| value));
        match self.data.take() {
            Some(BoxData::List(items)) => pending.extend(items),
            Some(BoxData::Dictionary(entries)) => {
                for (key, value) in entries {
                    pending.push(key);
                    pending.push(value);
                }
            }
            _ => {}
        }
    }
}

// Box graphs can be nested as deeply as the evaluator allows, so teardown
// must not recurse once per level. Children whose last handle we hold are
// emptied here before they are dropped, which keeps each nested drop shallow.
impl Drop for BoxInner {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(child) = pending.pop() {
            if let Some(mut inner) = Arc::into_inner(child.0) {
                inner.detach_children(&mut pending);
            }
        }
    }
}

/// The only value type of the language.
///
/// A `Box` is a reference: cloning it yields another handle to the same
/// object, and equality is identity. Variables may be changed through any
/// handle; the method and the native payload are fixed at construction.
#[derive(Clone)]
pub struct Box(Arc<BoxInner>);

impl Box {
    /// A fresh, empty box.
    pub fn new() -> Self {
        Self::assemble(HashMap::new(), BoxMethod::default(), None)
    }

    fn assemble(
        variables: HashMap<String, Box>,
        method: BoxMethod,
        data: Option<BoxData>,
    ) -> Self {
        Self(Arc::new(BoxInner {
            variables: RwLock::new(variables),
            method,
            data,
        }))
    }

    /// A box whose `components` variable is set to `components`.
    pub fn from_parts(components: Box, method: BoxMethod, data: Option<BoxData>) -> Self {
        let mut variables = HashMap::with_capacity(1);
        variables.insert(COMPONENTS.to_string(), components);
        Self::assemble(variables, method, data)
    }

    /// An empty box with a callable method.
    pub fn with_method(method: BoxMethod) -> Self {
        Self::assemble(HashMap::new(), method, None)
    }

    fn of_kind(kind: Kind, data: BoxData) -> Self {
        Self::from_parts(
            Self::from_list([kind.boxed()]),
            BoxMethod::default(),
            Some(data),
        )
    }

    /// The canonical Null box.
    pub fn null() -> Self {
        Kind::Null.boxed()
    }

    pub fn from_boolean(value: bool) -> Self {
        Self::of_kind(Kind::Boolean, BoxData::Boolean(value))
    }

    pub fn from_integer(value: i64) -> Self {
        Self::of_kind(Kind::Integer, BoxData::Integer(value))
    }

    pub fn from_real(value: f64) -> Self {
        Self::of_kind(Kind::Real, BoxData::Real(value))
    }

    pub fn from_string(value: impl Into<Vec<u8>>) -> Self {
        Self::of_kind(Kind::String, BoxData::String(value.into()))
    }

    /// A List-kind box.
    ///
    /// Unlike the other kinds, a list's `components` is the List kind box
    /// itself rather than a one-element list, since building that list would
    /// need a list first.
    pub fn from_list(items: impl IntoIterator<Item = Box>) -> Self {
        Self::from_parts(
            Kind::List.boxed(),
            BoxMethod::default(),
            Some(BoxData::List(items.into_iter().collect())),
        )
    }

    pub fn from_dictionary(entries: impl IntoIterator<Item = (Box, Box)>) -> Self {
        Self::of_kind(
            Kind::Dictionary,
            BoxData::Dictionary(entries.into_iter().collect()),
        )
    }

    /// Identity comparison.
    pub fn ptr_eq(a: &Box, b: &Box) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn is_null(&self) -> bool {
        Box::ptr_eq(self, &Box::null())
    }

    /// Direct lookup. The `components` and `call` chains are not consulted.
    pub fn get_variable(&self, name: &str) -> Option<Box> {
        self.0.variables.read().get(name).cloned()
    }

    /// Sets `name`, or removes it when `value` is `None`.
    pub fn set_variable(&self, name: &str, value: Option<Box>) {
        let mut variables = self.0.variables.write();
        match value {
            Some(value) => {
                variables.insert(name.to_string(), value);
            }
            None => {
                variables.remove(name);
            }
        }
    }

    /// Names of all variables, sorted.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.variables.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn get_components(&self) -> Option<Vec<Box>> {
        self.get_variable(COMPONENTS)?.as_list()
    }

    pub fn set_components(&self, components: impl IntoIterator<Item = Box>) {
        self.set_variable(COMPONENTS, Some(Box::from_list(components)));
    }

    /// The method declared on this box itself.
    pub fn method(&self) -> &BoxMethod {
        &self.0.method
    }

    pub fn data(&self) -> Option<&BoxData> {
        self.0.data.as_ref()
    }

    /// Resolves the effective method by following the `call` chain.
    ///
    /// Starting from this box, `call` is followed while it is set and not
    /// Null; the method of the last box reached is returned.
    pub fn resolve_method(&self) -> Result<BoxMethod, EvalError> {
        let null = Box::null();
        let mut visited = HashSet::new();
        let mut current = self.clone();

        loop {
            if !visited.insert(Arc::as_ptr(&current.0)) {
                return Err(EvalError::DelegationCycle);
            }
            match current.get_variable(CALL) {
                Some(next) if !Box::ptr_eq(&next, &null) => current = next,
                _ => return Ok(current.method().clone()),
            }
        }
    }

    /// Whether `kind` is one of this box's components.
    pub fn is_kind(&self, kind: Kind) -> bool {
        let Some(components) = self.get_variable(COMPONENTS) else {
            return false;
        };
        let kind_box = kind.boxed();
        if Box::ptr_eq(&components, &kind_box) {
            return true;
        }
        components
            .as_list()
            .is_some_and(|items| items.iter().any(|item| Box::ptr_eq(item, &kind_box)))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self.data()? {
            BoxData::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.data()? {
            BoxData::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self.data()? {
            BoxData::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string_bytes(&self) -> Option<&[u8]> {
        match self.data()? {
            BoxData::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<Vec<Box>> {
        match self.data()? {
            BoxData::List(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl Default for Box {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Box {
    fn eq(&self, other: &Self) -> bool {
        Box::ptr_eq(self, other)
    }
}

impl Eq for Box {}

// Variable values are not followed: scopes routinely refer back to
// themselves.
impl fmt::Debug for Box {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kind) = Kind::of_kind_box(self) {
            return write!(f, "Box(<{}>)", kind.name());
        }
        f.debug_struct("Box")
            .field("variables", &self.variable_names())
            .field("callable", &self.method().is_callable())
            .field("data", &self.data())
            .finish()
    }
}

impl fmt::Display for Box {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(BoxData::Boolean(value)) => write!(f, "{}", value),
            Some(BoxData::Integer(value)) => write!(f, "{}", value),
            Some(BoxData::Real(value)) => write!(f, "{:?}", value),
            Some(BoxData::String(bytes)) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Some(BoxData::List(items)) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Some(BoxData::Dictionary(entries)) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            None => match Kind::of_kind_box(self) {
                Some(Kind::Null) => write!(f, "null"),
                Some(kind) => write!(f, "<{}>", kind.name()),
                None => {
                    let names: Vec<String> = self
                        .variable_names()
                        .into_iter()
                        .filter(|name| name != COMPONENTS)
                        .collect();
                    write!(f, "{{{}}}", names.join(", "))
                }
            },
        }
    }
}

use std::fmt;
use std::rc::Rc;

/// Accessor for the enclosing report's description, read every time slug
/// suggestions are requested.
#[derive(Clone)]
pub struct ReportContext {
    read: Rc<dyn Fn() -> serde_json::Value>,
}

impl ReportContext {
    pub fn from_fn(read: impl Fn() -> serde_json::Value + 'static) -> Self {
        Self {
            read: Rc::new(read),
        }
    }

    pub fn fixed(value: serde_json::Value) -> Self {
        Self::from_fn(move || value.clone())
    }

    pub fn current(&self) -> serde_json::Value {
        (self.read)()
    }
}

impl Default for ReportContext {
    fn default() -> Self {
        Self::fixed(serde_json::Value::Null)
    }
}

impl fmt::Debug for ReportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportContext")
            .field("current", &self.current())
            .finish()
    }
}

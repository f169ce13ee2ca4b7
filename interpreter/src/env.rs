use ahash::AHashMap;

use crate::value::Value;

/// Bindings of one function call, parameter name to value.
#[derive(Debug, Default)]
pub(crate) struct Frame<'a> {
    values: AHashMap<&'a str, Value>,
}

impl<'a> Frame<'a> {
    pub(crate) fn new() -> Self {
        Frame {
            values: AHashMap::new(),
        }
    }

    pub(crate) fn define(&mut self, key: &'a str, value: Value) {
        self.values.insert(key, value);
    }

    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// Frames of the calls currently being evaluated. The bottom frame belongs to the top-level form
/// and is never popped.
#[derive(Debug)]
pub(crate) struct CallStack<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> CallStack<'a> {
    pub(crate) fn new() -> Self {
        CallStack {
            frames: vec![Frame::new()],
        }
    }

    pub(crate) fn push(&mut self, frame: Frame<'a>) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of function frames live above the bottom frame.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    // Lookups only ever see the innermost frame, callers' bindings are not visible
    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        self.frames.last().and_then(|frame| frame.get(key))
    }

    pub(crate) fn define(&mut self, key: &'a str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.define(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::env::{CallStack, Frame};
    use crate::value::Value;

    #[test]
    fn test_define_and_get() {
        let mut stack = CallStack::new();
        stack.define("foo", Value::from("bar"));
        stack.define("baz", Value::from(false));

        assert_eq!(stack.get("foo"), Some(Value::from("bar")));
        assert_eq!(stack.get("baz"), Some(Value::from(false)));
        assert_eq!(stack.get("eggs"), None);
    }

    #[test]
    fn test_only_top_frame_is_visible() {
        let mut stack = CallStack::new();
        stack.define("foo", Value::from(1));

        let mut frame = Frame::new();
        frame.define("bar", Value::from(2));
        stack.push(frame);

        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.get("foo"), None);
        assert_eq!(stack.get("bar"), Some(Value::from(2)));

        stack.pop();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.get("foo"), Some(Value::from(1)));
        assert_eq!(stack.get("bar"), None);
    }

    #[test]
    fn test_bottom_frame_is_never_popped() {
        let mut stack = CallStack::new();
        stack.define("foo", Value::from(1));
        stack.pop();

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.get("foo"), Some(Value::from(1)));
    }
}

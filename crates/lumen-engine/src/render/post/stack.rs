use anyhow::{Context, Result};

use crate::render::{names, RenderCtx};

use super::{PostEffect, PostFrame};

/// Ordered chain of post effects.
///
/// Effects run in insertion order; each one sees the previous one's output
/// as scene color.
#[derive(Default)]
pub struct PostStack {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `effect` and attaches it.
    pub fn push(&mut self, mut effect: Box<dyn PostEffect>) {
        log::info!("attaching post effect `{}`", effect.name());
        effect.on_attach();
        self.effects.push(effect);
    }

    /// Detaches and returns the first effect named `name`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn PostEffect>> {
        let index = self.effects.iter().position(|e| e.name() == name)?;
        let mut effect = self.effects.remove(index);
        log::info!("detaching post effect `{name}`");
        effect.on_detach();
        Some(effect)
    }

    /// Detaches every effect, last first.
    pub fn clear(&mut self) {
        while let Some(mut effect) = self.effects.pop() {
            log::info!("detaching post effect `{}`", effect.name());
            effect.on_detach();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.effects.iter().map(|e| e.name())
    }

    /// Runs every effect once for this frame.
    ///
    /// A stale output from the previous frame is dropped first so the first
    /// effect always reads the color pass.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, frame: &mut PostFrame<'_>) -> Result<()> {
        frame.targets.remove(names::POST_OUTPUT);
        for effect in &mut self.effects {
            let name = effect.name();
            effect
                .render(ctx, frame)
                .with_context(|| format!("post effect `{name}` failed"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl PostEffect for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn on_attach(&mut self) {
            self.log.borrow_mut().push(format!("attach {}", self.name));
        }

        fn on_detach(&mut self) {
            self.log.borrow_mut().push(format!("detach {}", self.name));
        }

        fn render(&mut self, _ctx: &RenderCtx<'_>, _frame: &mut PostFrame<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn PostEffect> {
        Box::new(Recorder { name, log: Rc::clone(log) })
    }

    #[test]
    fn push_attaches_and_remove_detaches() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = PostStack::new();
        stack.push(recorder("outline", &log));
        stack.push(recorder("bloom", &log));
        assert_eq!(stack.names().collect::<Vec<_>>(), ["outline", "bloom"]);

        let removed = stack.remove("outline");
        assert!(removed.is_some());
        assert_eq!(stack.len(), 1);
        assert_eq!(*log.borrow(), ["attach outline", "attach bloom", "detach outline"]);
    }

    #[test]
    fn remove_unknown_is_none() {
        let mut stack = PostStack::new();
        assert!(stack.remove("missing").is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn clear_detaches_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = PostStack::new();
        stack.push(recorder("a", &log));
        stack.push(recorder("b", &log));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(log.borrow()[2..], ["detach b", "detach a"]);
    }
}

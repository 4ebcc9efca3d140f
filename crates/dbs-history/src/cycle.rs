use std::cell::Cell;
use std::rc::Rc;

/// Liveness flag for one fetch cycle.
///
/// Every clone shares the same flag. The controller keeps one clone and moves
/// another into the cycle future; once [`retire`](Self::retire) is called the
/// future must not publish anything. Single-threaded: the check and
/// the publish happen in the same poll with no await in between.
#[derive(Debug, Clone)]
pub struct CycleToken {
    live: Rc<Cell<bool>>,
}

impl CycleToken {
    pub fn new() -> Self {
        Self {
            live: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub fn retire(&self) {
        self.live.set(false);
    }
}

impl Default for CycleToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retire_is_seen_by_every_clone() {
        let token = CycleToken::new();
        let captured = token.clone();
        assert!(captured.is_live());
        token.retire();
        assert!(!captured.is_live());
        assert!(!token.is_live());
    }

    #[test]
    fn fresh_tokens_are_independent() {
        let old = CycleToken::new();
        old.retire();
        let new = CycleToken::new();
        assert!(new.is_live());
        assert!(!old.is_live());
    }
}

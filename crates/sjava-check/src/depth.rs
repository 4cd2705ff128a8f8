use lazy_static::lazy_static;
use regex::Regex;
use sjava_resolve::ScopeTree;
use sjava_syntax::is_comment;

use crate::StructureError;

lazy_static! {
    static ref OPENING_SCOPE: Regex = Regex::new(r"^.*?\{\s*$").expect("opening scope pattern is valid");
    static ref CLOSING_SCOPE: Regex = Regex::new(r"^\s*\}\s*$").expect("closing scope pattern is valid");
}

/// Whether `line` opens a block: it ends with `{` and is not a comment.
pub fn opens_scope(line: &str) -> bool {
    !is_comment(line) && OPENING_SCOPE.is_match(line)
}

/// Whether `line` is a lone `}`.
pub fn closes_scope(line: &str) -> bool {
    !is_comment(line) && CLOSING_SCOPE.is_match(line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Only count nesting.
    CountOnly,
    /// Also push and pop scopes of the [`ScopeTree`] as blocks open and close.
    Switching,
}

/// How a line changed the nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthChange {
    Opened,
    Closed,
    Unchanged,
}

/// Follows block nesting line by line.
#[derive(Debug, Clone)]
pub struct DepthTracker {
    mode: DepthMode,
    depth: usize,
}

impl DepthTracker {
    pub fn new(mode: DepthMode) -> Self {
        Self { mode, depth: 0 }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_global(&self) -> bool {
        self.depth == 0
    }

    /// Updates the depth for `line`. In [`DepthMode::Switching`] the scope
    /// tree follows along; otherwise it is left alone.
    pub fn accept(&mut self, line: &str, scopes: &mut ScopeTree) -> Result<DepthChange, StructureError> {
        if opens_scope(line) {
            self.depth += 1;
            if self.mode == DepthMode::Switching {
                scopes.push_scope();
            }
            Ok(DepthChange::Opened)
        } else if closes_scope(line) {
            self.depth = self.depth.checked_sub(1).ok_or(StructureError::MismatchedBraces)?;
            if self.mode == DepthMode::Switching {
                scopes.pop_scope();
            }
            Ok(DepthChange::Closed)
        } else {
            Ok(DepthChange::Unchanged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_patterns() {
        assert!(opens_scope("void f(int a) {"));
        assert!(opens_scope("  if (a){   "));
        assert!(opens_scope("{"));
        assert!(!opens_scope("// if (a) {"));
        assert!(!opens_scope("{ int a; }"));

        assert!(closes_scope("}"));
        assert!(closes_scope("   }  "));
        assert!(!closes_scope("};"));
        assert!(!closes_scope("//}"));
        assert!(!closes_scope("} }"));
    }

    #[test]
    fn test_count_only_leaves_scopes_alone() {
        let mut scopes = ScopeTree::new();
        let mut tracker = DepthTracker::new(DepthMode::CountOnly);
        assert_eq!(tracker.accept("void f() {", &mut scopes), Ok(DepthChange::Opened));
        assert_eq!(tracker.accept("int a;", &mut scopes), Ok(DepthChange::Unchanged));
        assert_eq!(tracker.depth(), 1);
        assert_eq!(scopes.current(), scopes.root());
        assert_eq!(tracker.accept("}", &mut scopes), Ok(DepthChange::Closed));
        assert!(tracker.is_global());
    }

    #[test]
    fn test_switching_follows_depth() {
        let mut scopes = ScopeTree::new();
        let mut tracker = DepthTracker::new(DepthMode::Switching);
        tracker.accept("void f() {", &mut scopes).unwrap();
        let body = scopes.current();
        tracker.accept("while (true) {", &mut scopes).unwrap();
        assert_eq!(scopes.scope(scopes.current()).parent(), Some(body));
        tracker.accept("}", &mut scopes).unwrap();
        assert_eq!(scopes.current(), body);
        tracker.accept("}", &mut scopes).unwrap();
        assert_eq!(scopes.current(), scopes.root());
    }

    #[test]
    fn test_close_at_global_depth() {
        let mut scopes = ScopeTree::new();
        let mut tracker = DepthTracker::new(DepthMode::CountOnly);
        assert_eq!(
            tracker.accept("}", &mut scopes),
            Err(StructureError::MismatchedBraces)
        );
    }
}

//! Per-owner tree cache.

use super::node::{NodeArena, NodeId};
use crate::error::{LayoutError, LayoutResult};

/// The trees one owner (or window) built during its last Layout pass.
#[derive(Debug, Default)]
pub struct LayoutCache {
    /// Root group everything is appended to.
    pub(crate) top_level: Option<NodeId>,
    /// Open groups, root first.
    pub(crate) group_stack: Vec<NodeId>,
    /// Holder of floating areas.
    pub(crate) windows: Option<NodeId>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Innermost open group.
    pub(crate) fn current(&self) -> LayoutResult<NodeId> {
        self.group_stack.last().copied().ok_or(LayoutError::NoContext)
    }

    #[inline]
    pub(crate) fn push(&mut self, id: NodeId) {
        self.group_stack.push(id);
    }

    /// Close the innermost group. The root is never popped.
    pub(crate) fn pop(&mut self) -> LayoutResult<NodeId> {
        if self.group_stack.len() <= 1 {
            return Err(LayoutError::NoOpenGroup);
        }
        self.group_stack.pop().ok_or(LayoutError::NoOpenGroup)
    }

    /// Groups opened on top of the root.
    #[inline]
    pub fn open_groups(&self) -> usize {
        self.group_stack.len().saturating_sub(1)
    }

    /// Drop open groups back to the root, returning how many were dropped.
    pub(crate) fn close_all(&mut self) -> usize {
        let open = self.open_groups();
        self.group_stack.truncate(1);
        open
    }

    /// Replace both trees with fresh roots, releasing the old ones.
    pub(crate) fn replace(&mut self, arena: &mut NodeArena, top_level: NodeId, windows: NodeId) -> usize {
        let released = self.release(arena);
        self.top_level = Some(top_level);
        self.windows = Some(windows);
        self.group_stack.push(top_level);
        released
    }

    /// Rewind every cursor a pass starts from.
    pub(crate) fn rewind(&mut self, arena: &mut NodeArena) -> LayoutResult<()> {
        let (Some(top_level), Some(windows)) = (self.top_level, self.windows) else {
            return Err(LayoutError::NoContext);
        };
        arena.group_mut(top_level)?.reset_cursor();
        arena.group_mut(windows)?.reset_cursor();
        self.group_stack.clear();
        self.group_stack.push(top_level);
        Ok(())
    }

    /// Release both trees, returning the number of freed nodes.
    pub(crate) fn release(&mut self, arena: &mut NodeArena) -> usize {
        self.group_stack.clear();
        let mut released = 0;
        if let Some(root) = self.top_level.take() {
            released += arena.release(root);
        }
        if let Some(windows) = self.windows.take() {
            released += arena.release(windows);
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::constraints::SizeConstraint;
    use crate::layout::node::{Group, GroupVariant, Node, NodeKind};
    use crate::layout::style::LayoutStyle;

    fn group(arena: &mut NodeArena) -> NodeId {
        let group = Group::new(arena.child_list(), true, GroupVariant::Plain);
        arena.alloc(Node::new(LayoutStyle::none(), SizeConstraint::ZERO, &[], NodeKind::Group(group)))
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut arena = NodeArena::new();
        let mut cache = LayoutCache::new();
        let (root, windows) = (group(&mut arena), group(&mut arena));
        cache.replace(&mut arena, root, windows);
        assert_eq!(cache.current().unwrap(), root);
        assert!(matches!(cache.pop(), Err(LayoutError::NoOpenGroup)));

        let inner = group(&mut arena);
        cache.push(inner);
        assert_eq!(cache.open_groups(), 1);
        assert_eq!(cache.pop().unwrap(), inner);
    }

    #[test]
    fn test_replace_releases_previous_trees() {
        let mut arena = NodeArena::new();
        let mut cache = LayoutCache::new();
        let (root, windows) = (group(&mut arena), group(&mut arena));
        cache.replace(&mut arena, root, windows);

        let (root2, windows2) = (group(&mut arena), group(&mut arena));
        assert_eq!(cache.replace(&mut arena, root2, windows2), 2);
        assert!(!arena.contains(root));
        assert_eq!(cache.group_stack, vec![root2]);
    }

    #[test]
    fn test_close_all_and_rewind() {
        let mut arena = NodeArena::new();
        let mut cache = LayoutCache::new();
        let (root, windows) = (group(&mut arena), group(&mut arena));
        cache.replace(&mut arena, root, windows);
        let a = group(&mut arena);
        let b = group(&mut arena);
        cache.push(a);
        cache.push(b);
        assert_eq!(cache.close_all(), 2);
        assert_eq!(cache.current().unwrap(), root);

        arena.group_mut(root).unwrap().cursor = 3;
        cache.rewind(&mut arena).unwrap();
        assert_eq!(arena.group(root).unwrap().cursor, 0);
    }

    #[test]
    fn test_empty_cache_cannot_rewind() {
        let mut arena = NodeArena::new();
        let mut cache = LayoutCache::new();
        assert!(matches!(cache.rewind(&mut arena), Err(LayoutError::NoContext)));
        assert!(matches!(cache.current(), Err(LayoutError::NoContext)));
    }
}

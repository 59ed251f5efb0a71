use std::fmt;

use compare::Compare;

use crate::{
    node::{Color, NodeId},
    tree::RawTree,
    RbMap,
};

/// Tree-shaped rendering of a map, see [`RbMap::render`].
pub struct Render<'a, K, V> {
    tree: &'a RawTree<K, V>,
}

impl<K: fmt::Debug, V> Render<'_, K, V> {
    fn node(
        &self,
        f: &mut fmt::Formatter<'_>,
        x: NodeId,
        head: &str,
        prefix: &str,
    ) -> fmt::Result {
        let color = match self.tree.arena[x].color {
            Color::Red => 'R',
            Color::Black => 'B',
        };
        writeln!(f, "{head}{:?} ({color})", self.tree.arena.key(x))?;

        let links = self.tree.arena[x];
        if links.left.is_none() && links.right.is_none() {
            return Ok(());
        }
        for (child, last) in [(links.left, false), (links.right, true)] {
            let (branch, indent) =
                if last { ("└── ", "    ") } else { ("├── ", "│   ") };
            match child {
                Some(c) => self.node(
                    f,
                    c,
                    &format!("{prefix}{branch}"),
                    &format!("{prefix}{indent}"),
                )?,
                None => writeln!(f, "{prefix}{branch}·")?,
            }
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V> fmt::Display for Render<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.root {
            Some(r) => self.node(f, r, "", ""),
            None => writeln!(f, "·"),
        }
    }
}

impl<K, V, C> RbMap<K, V, C> {
    /// Renders the tree, one key per line with its color. Absent
    /// children of an inner node are shown as `·`.
    ///
    /// ```
    /// use rb_map::RbMap;
    ///
    /// let map: RbMap<_, _> = [(2, ()), (1, ()), (3, ()), (4, ())].into();
    /// assert_eq!(
    ///     map.render().to_string(),
    ///     "\
    /// 2 (B)
    /// ├── 1 (B)
    /// └── 3 (B)
    ///     ├── ·
    ///     └── 4 (R)
    /// "
    /// );
    /// ```
    pub fn render(&self) -> Render<'_, K, V>
    where
        K: fmt::Debug,
    {
        Render { tree: &self.tree }
    }
}

impl<K, V, C: Compare<K>> RbMap<K, V, C> {
    /// Panics unless the tree is a valid red-black tree consistent with
    /// `len()`. Returns the black height, absent children not counted.
    pub fn assert_invariants(&self) -> usize {
        let tree = &self.tree;
        let Some(root) = tree.root else {
            assert_eq!(tree.len, 0, "empty tree with nonzero length");
            return 0;
        };
        assert_eq!(tree.parent(root), None, "root with a parent");
        assert_eq!(tree.arena[root].color, Color::Black, "red root");

        let mut count = 0;
        let height = self.check_subtree(root, &mut count);
        assert_eq!(count, tree.len, "length mismatch");
        assert_eq!(height, tree.black_height_of(Some(root)));

        let mut cur = tree.first();
        while let Some(x) = cur {
            cur = tree.successor(x);
            if let Some(y) = cur {
                let (kx, ky) = (tree.arena.key(x), tree.arena.key(y));
                assert!(self.cmp.less(kx, ky), "keys out of order");
            }
        }
        height
    }

    fn check_subtree(&self, x: NodeId, count: &mut usize) -> usize {
        let tree = &self.tree;
        *count += 1;
        let links = tree.arena[x];
        let mut heights = [0; 2];
        for (h, child) in heights.iter_mut().zip([links.left, links.right]) {
            let Some(c) = child else { continue };
            assert_eq!(tree.parent(c), Some(x), "broken parent link");
            assert!(
                links.color == Color::Black
                    || tree.arena[c].color == Color::Black,
                "red node with a red child",
            );
            *h = self.check_subtree(c, count);
        }
        assert_eq!(heights[0], heights[1], "unequal black heights");
        heights[0] + (links.color == Color::Black) as usize
    }
}

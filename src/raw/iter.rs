use smallvec::SmallVec;

use super::node::Node;

/// Stack of ancestors still to be visited. Trees deeper than the inline capacity spill to the heap.
type Spine<'a, T> = SmallVec<[&'a Node<T>; 32]>;

/// In-order cursor over a tree, yielding each key once per occurrence.
///
/// The front and back walk independently; `remaining` stops them before they cross.
pub(crate) struct RawIter<'a, T> {
    front: Spine<'a, T>,
    front_key: Option<(&'a T, usize)>,
    back: Spine<'a, T>,
    back_key: Option<(&'a T, usize)>,
    remaining: usize,
}

impl<'a, T> RawIter<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        let mut front = Spine::new();
        let mut back = Spine::new();
        push_left_spine(&mut front, root);
        push_right_spine(&mut back, root);

        Self {
            front,
            front_key: None,
            back,
            back_key: None,
            remaining: root.map_or(0, Node::weight),
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, T> Iterator for RawIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            if let Some((key, repeats)) = self.front_key.as_mut()
                && *repeats > 0
            {
                *repeats -= 1;
                self.remaining -= 1;
                return Some(*key);
            }

            let node = self.front.pop()?;
            self.front_key = Some((node.key(), node.count()));
            push_left_spine(&mut self.front, node.right());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for RawIter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            if let Some((key, repeats)) = self.back_key.as_mut()
                && *repeats > 0
            {
                *repeats -= 1;
                self.remaining -= 1;
                return Some(*key);
            }

            let node = self.back.pop()?;
            self.back_key = Some((node.key(), node.count()));
            push_right_spine(&mut self.back, node.left());
        }
    }
}

impl<T> Clone for RawIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            front_key: self.front_key,
            back: self.back.clone(),
            back_key: self.back_key,
            remaining: self.remaining,
        }
    }
}

fn push_left_spine<'a, T>(stack: &mut Spine<'a, T>, mut node: Option<&'a Node<T>>) {
    while let Some(current) = node {
        stack.push(current);
        node = current.left();
    }
}

fn push_right_spine<'a, T>(stack: &mut Spine<'a, T>, mut node: Option<&'a Node<T>>) {
    while let Some(current) = node {
        stack.push(current);
        node = current.right();
    }
}

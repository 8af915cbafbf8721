//! The diagram stack: an owned, insertion-ordered table of named diagrams.
use std::fmt;
use fnv::FnvHashMap;
use super::diagram::Diagram;
use super::error::{Error, Result};
use super::linalg::Scalar;

/// Names are unique; positions follow insertion order and are stable
/// across `replace`.
#[derive(Clone, Debug)]
pub struct DiagramStack<T> {
    diagrams: Vec<Diagram<T>>,
    index: FnvHashMap<String, usize>,
}

impl<T> Default for DiagramStack<T> {
    fn default() -> Self {
        Self {
            diagrams: Vec::new(),
            index: Default::default(),
        }
    }
}

impl<T: Scalar> DiagramStack<T> {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).cloned()
    }

    pub fn find(&self, name: &str) -> Option<&Diagram<T>> {
        self.find_index(name).map(move |i| &self.diagrams[i])
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Diagram<T>> {
        match self.find_index(name) {
            Some(i) => Some(&mut self.diagrams[i]),
            None => None,
        }
    }

    /// Like `find`, but a missing diagram is an error.
    pub fn get(&self, name: &str) -> Result<&Diagram<T>> {
        self.find(name).ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Diagram<T>> {
        self.find_mut(name).ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Append a diagram.  Fails if its name is taken.
    pub fn push(&mut self, diagram: Diagram<T>) -> Result<usize> {
        if self.index.contains_key(diagram.name()) {
            return Err(Error::AlreadyExists(diagram.name().to_owned()));
        }
        let pos = self.diagrams.len();
        self.index.insert(diagram.name().to_owned(), pos);
        self.diagrams.push(diagram);
        Ok(pos)
    }

    /// Put `diagram` into the slot of the diagram called `name`, dropping
    /// the old one.
    pub fn replace(&mut self, name: &str, mut diagram: Diagram<T>)
                   -> Result<usize> {
        let pos = self.find_index(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;
        diagram.set_name(name);
        self.diagrams[pos] = diagram;
        Ok(pos)
    }

    /// Replace the diagram of the same name if there is one, otherwise
    /// append.  Returns the position.
    pub fn insert_or_replace(&mut self, diagram: Diagram<T>) -> usize {
        match self.find_index(diagram.name()) {
            Some(pos) => {
                self.diagrams[pos] = diagram;
                pos
            }
            None => {
                let pos = self.diagrams.len();
                self.index.insert(diagram.name().to_owned(), pos);
                self.diagrams.push(diagram);
                pos
            }
        }
    }

    /// Remove a diagram.  Later diagrams move down by one position.
    pub fn erase(&mut self, name: &str) -> Result<Diagram<T>> {
        let pos = self.index.remove(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;
        let diagram = self.diagrams.remove(pos);
        for i in self.index.values_mut() {
            if *i > pos {
                *i -= 1;
            }
        }
        Ok(diagram)
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return self.get(old).map(|_| ());
        }
        if self.index.contains_key(new) {
            return Err(Error::AlreadyExists(new.to_owned()));
        }
        let pos = self.index.remove(old)
            .ok_or_else(|| Error::NotFound(old.to_owned()))?;
        self.diagrams[pos].set_name(new);
        self.index.insert(new.to_owned(), pos);
        Ok(())
    }

    /// Current top of the stack, for use with `restore_position`.
    pub fn position(&self) -> usize {
        self.diagrams.len()
    }

    /// Drop every diagram at or above `pos`.
    pub fn restore_position(&mut self, pos: usize) {
        if pos >= self.diagrams.len() {
            return;
        }
        for diagram in self.diagrams.drain(pos ..) {
            self.index.remove(diagram.name());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagram<T>> {
        self.diagrams.iter()
    }

    pub fn memory_used(&self) -> usize {
        self.diagrams.iter().map(|d| d.memory_used()).sum()
    }
}

impl<T: Scalar> fmt::Display for DiagramStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "diagram stack is empty");
        }
        writeln!(f, "     {:<12}{:<10}{:<10}{:<10}{:>8}{:>8}{:>14}",
                 "<name>", "qparts", "valence", "order",
                 "#blocks", "#uniq", "bytes")?;
        for (i, d) in self.diagrams.iter().enumerate() {
            writeln!(f, "[{:2}] {:<12}{:<10}{:<10}{:<10}{:>8}{:>8}{:>14}",
                     i, d.name(), d.qparts_string(), d.valence_string(),
                     d.order_string(), d.blocks().len(),
                     d.num_unique_blocks(), d.memory_used())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;
    use super::super::diagram::t3_mask;
    use super::super::spinors::SpinorSpace;
    use super::super::spinors::tests::small_space;

    fn make(space: &Arc<SpinorSpace>, name: &str, qparts: &str)
            -> Diagram<f64> {
        let rank = qparts.len();
        let valence: String = (0 .. rank).map(|_| '0').collect();
        let order: String = (1 ..= rank).map(|i| i.to_string()).collect();
        Diagram::new(space.clone(), name, qparts, &valence,
                     &t3_mask(rank, false), &order, false, 0).unwrap()
    }

    fn names(stack: &DiagramStack<f64>) -> Vec<&str> {
        stack.iter().map(|d| d.name()).collect()
    }

    #[test]
    fn test_push_find() {
        let space = Arc::new(small_space());
        let mut stack = DiagramStack::new();
        assert_eq!(stack.push(make(&space, "a", "hp")).unwrap(), 0);
        assert_eq!(stack.push(make(&space, "b", "hh")).unwrap(), 1);
        match stack.push(make(&space, "a", "pp")) {
            Err(Error::AlreadyExists(ref n)) if n == "a" => {}
            r => panic!("unexpected: {:?}", r),
        }
        assert_eq!(stack.find("b").unwrap().qparts_string(), "hh");
        assert!(stack.find("c").is_none());
        assert_eq!(stack.find_index("b"), Some(1));
        assert!(stack.get("c").is_err());
    }

    #[test]
    fn test_replace() {
        let space = Arc::new(small_space());
        let mut stack = DiagramStack::new();
        stack.push(make(&space, "a", "hp")).unwrap();
        stack.push(make(&space, "b", "hh")).unwrap();
        assert_eq!(stack.replace("a", make(&space, "tmp", "pp")).unwrap(), 0);
        assert_eq!(names(&stack), vec!["a", "b"]);
        assert_eq!(stack.find("a").unwrap().qparts_string(), "pp");
        assert!(stack.replace("zz", make(&space, "zz", "pp")).is_err());
        assert_eq!(stack.insert_or_replace(make(&space, "b", "hp")), 1);
        assert_eq!(stack.insert_or_replace(make(&space, "c", "hp")), 2);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_erase_rename() {
        let space = Arc::new(small_space());
        let mut stack = DiagramStack::new();
        for name in &["a", "b", "c"] {
            stack.push(make(&space, name, "hp")).unwrap();
        }
        stack.erase("a").unwrap();
        assert_eq!(stack.find_index("c"), Some(1));
        assert!(stack.erase("a").is_err());
        stack.rename("b", "x").unwrap();
        assert_eq!(names(&stack), vec!["x", "c"]);
        assert!(stack.find("b").is_none());
        assert!(stack.rename("x", "c").is_err());
        assert!(stack.rename("nope", "y").is_err());
    }

    #[test]
    fn test_restore_position() {
        let space = Arc::new(small_space());
        let mut stack = DiagramStack::new();
        stack.push(make(&space, "keep", "hp")).unwrap();
        let pos = stack.position();
        stack.push(make(&space, "tmp1", "hp")).unwrap();
        stack.push(make(&space, "tmp2", "hp")).unwrap();
        stack.restore_position(pos);
        assert_eq!(names(&stack), vec!["keep"]);
        assert!(stack.find("tmp1").is_none());
        stack.push(make(&space, "tmp1", "hh")).unwrap();
        let table = stack.to_string();
        assert!(table.contains("keep"));
        assert!(table.contains("tmp1"));
    }
}

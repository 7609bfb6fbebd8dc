/// A production body with a marked position (the "dot") indicating how
/// much of it has been matched.
///
/// Items are plain values: equality and hashing go over the symbol
/// sequence and the dot, never over identity. This is what makes
/// state deduplication by set equality work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    symbols: Vec<String>,
    dot: usize,
}

impl Item {
    /// # Panics
    /// Panics if `dot` lies past the end of the body.
    pub fn new(symbols: Vec<String>, dot: usize) -> Self {
        assert!(dot <= symbols.len(), "dot {dot} out of range");
        Self { symbols, dot }
    }

    /// An item with the dot at position 0.
    pub fn start(symbols: Vec<String>) -> Self {
        Self::new(symbols, 0)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    /// The whole body has been matched.
    pub fn is_complete(&self) -> bool {
        self.dot == self.symbols.len()
    }

    /// The symbol immediately after the dot, if any.
    pub fn next_symbol(&self) -> Option<&str> {
        self.symbols.get(self.dot).map(String::as_str)
    }

    /// The same item with the dot advanced over one symbol.
    ///
    /// # Panics
    /// Panics if the item is already complete.
    pub fn advanced(&self) -> Self {
        Self::new(self.symbols.clone(), self.dot + 1)
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, symbol) in self.symbols.iter().enumerate() {
            if i == self.dot {
                write!(f, ". ")?;
            }
            write!(f, "{symbol}")?;
            if i + 1 < self.symbols.len() {
                write!(f, " ")?;
            }
        }
        if self.is_complete() {
            write!(f, " .")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn item(symbols: &[&str], dot: usize) -> Item {
        Item::new(symbols.iter().map(|s| s.to_string()).collect(), dot)
    }

    #[test]
    fn equality_is_structural() {
        let a = item(&["S", "^", "P"], 1);
        let b = item(&["S", "^", "P"], 1);
        assert_eq!(a, b);
        assert_ne!(a, b.advanced());

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn advance_until_complete() {
        let mut it = item(&["[", "S", "]"], 0);
        assert_eq!(it.next_symbol(), Some("["));
        it = it.advanced();
        assert_eq!(it.next_symbol(), Some("S"));
        it = it.advanced().advanced();
        assert!(it.is_complete());
        assert_eq!(it.next_symbol(), None);
    }

    #[test]
    fn display_marks_the_dot() {
        assert_eq!(item(&["S", "^", "P"], 0).to_string(), ". S ^ P");
        assert_eq!(item(&["S", "^", "P"], 1).to_string(), "S . ^ P");
        assert_eq!(item(&["S", "^", "P"], 3).to_string(), "S ^ P .");
    }
}

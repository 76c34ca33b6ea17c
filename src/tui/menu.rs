/// A fixed list of choices with one selected; `next`/`prev` wrap around.
#[derive(Debug, Clone)]
pub struct Selector<T> {
    title: &'static str,
    options: Vec<T>,
    index: usize,
}

impl<T> Selector<T> {
    /// `options` must not be empty.
    pub fn new(title: &'static str, options: Vec<T>) -> Self {
        debug_assert!(!options.is_empty());
        Self {
            title,
            options,
            index: 0,
        }
    }

    /// Starts on the first option matching `pred`, or stays on the first option.
    pub fn selecting(mut self, pred: impl Fn(&T) -> bool) -> Self {
        self.index = self.options.iter().position(pred).unwrap_or(0);
        self
    }

    #[inline]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[inline]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn current(&self) -> &T {
        &self.options[self.index]
    }

    pub fn next(&mut self) -> &T {
        self.index = (self.index + 1) % self.options.len();
        self.current()
    }

    pub fn prev(&mut self) -> &T {
        self.index = (self.index + self.options.len() - 1) % self.options.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut menu = Selector::new("Precision", vec![0u32, 1, 2]);
        assert_eq!(*menu.current(), 0);
        assert_eq!(*menu.prev(), 2);
        assert_eq!(*menu.next(), 0);
        assert_eq!(*menu.next(), 1);
        assert_eq!(menu.index(), 1);
    }

    #[test]
    fn test_selecting() {
        let pairs = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];
        let menu =
            Selector::new("Pair", pairs.clone()).selecting(|p| p.eq_ignore_ascii_case("ethusdt"));
        assert_eq!(menu.current(), "ETHUSDT");

        let menu = Selector::new("Pair", pairs).selecting(|p| p == "DOGEUSDT");
        assert_eq!(menu.current(), "BTCUSDT");
        assert_eq!(menu.title(), "Pair");
    }
}

//! DOM text mirrors
//!
//! The block counter is the only HUD element. It writes through a
//! [`TextSink`] so the formatting can be tested off the browser.

/// Something that can display a line of text
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

impl TextSink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// Mirrors the block count into a text element
pub struct ScoreDisplay<S: TextSink> {
    sink: S,
    shown: Option<u64>,
}

impl<S: TextSink> ScoreDisplay<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, shown: None }
    }

    /// Write `count` to the element (skipped if already showing it)
    pub fn update_block_count(&mut self, count: u64) {
        if self.shown == Some(count) {
            return;
        }
        self.sink.set_text(&count.to_string());
        self.shown = Some(count);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// DOM element sink (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct ElementText(pub web_sys::Element);

#[cfg(target_arch = "wasm32")]
impl TextSink for ElementText {
    fn set_text(&mut self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

/// Block counter bound to `#block-count`
///
/// Panics if the element is missing; the page is expected to provide it.
#[cfg(target_arch = "wasm32")]
pub fn block_count_display(document: &web_sys::Document) -> ScoreDisplay<ElementText> {
    let el = document
        .get_element_by_id("block-count")
        .expect("no #block-count element");
    ScoreDisplay::new(ElementText(el))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_count() {
        let mut display = ScoreDisplay::new(String::new());
        display.update_block_count(20);
        assert_eq!(display.sink(), "20");
        display.update_block_count(21);
        assert_eq!(display.sink(), "21");
    }

    struct CountingSink(u32);

    impl TextSink for CountingSink {
        fn set_text(&mut self, _text: &str) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_skips_unchanged_count() {
        let mut display = ScoreDisplay::new(CountingSink(0));
        display.update_block_count(3);
        display.update_block_count(3);
        assert_eq!(display.sink().0, 1);
    }
}

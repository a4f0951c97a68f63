//! Lazy cache of node icon images.

use std::collections::HashMap;

use web_sys::HtmlImageElement;

/// One `HtmlImageElement` per icon URL, created on first use. The browser
/// decodes asynchronously; `get` only hands an image back once it is
/// drawable, so callers fall back to the badge until then.
#[derive(Default)]
pub struct IconCache {
	images: HashMap<String, HtmlImageElement>,
}

impl IconCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&mut self, src: &str) -> Option<&HtmlImageElement> {
		let image = self.images.entry(src.to_owned()).or_insert_with(|| {
			let image = HtmlImageElement::new().unwrap();
			image.set_src(src);
			image
		});
		(image.complete() && image.natural_width() > 0).then_some(&*image)
	}
}

//! Dropped `File` objects as core `DroppedFile`s.

use dropnkeep_core::{DroppedFile, FileReadError, NamedFile};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

pub struct WebFile {
    file: File,
    name: String,
}

impl WebFile {
    pub fn new(file: File) -> Self {
        let name = file.name();
        Self { file, name }
    }

    /// Every file of a drop, in drop order.
    pub fn from_list(list: &FileList) -> Vec<Self> {
        (0..list.length())
            .filter_map(|index| list.get(index))
            .map(Self::new)
            .collect()
    }
}

impl NamedFile for WebFile {
    fn name(&self) -> &str {
        &self.name
    }
}

impl DroppedFile for WebFile {
    fn size(&self) -> u64 {
        self.file.size().max(0.0) as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, FileReadError> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|err| FileReadError::new(describe(&err)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "unknown read error".to_string())
}

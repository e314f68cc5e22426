use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Reads a JSON document.
pub fn load<T: DeserializeOwned>(file_path: &Path) -> Result<T, std::io::Error> {
    let file = File::open(file_path)?;
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(file));
    let t = T::deserialize(&mut de)?;
    Ok(t)
}

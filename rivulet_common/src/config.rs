//! Load json configuration files.

use ::std::{fs::File, io::BufReader, path::Path};

use ::anyhow::Context;
use ::serde::de::DeserializeOwned;
use ::serde_json::from_reader;

use crate::error::{Result, RivuletError};

/// Read a json config file and deserialize it into `T`.
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Cannot open config file {}", path.display()))
        .map_err(RivuletError::fail_to_load_config)?;
    let reader = BufReader::new(file);
    let config = from_reader(reader)
        .with_context(|| format!("Invalid config file {}", path.display()))
        .map_err(RivuletError::fail_to_load_config)?;
    Ok(config)
}

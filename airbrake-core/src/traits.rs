use crate::imports::*;

pub trait Init {
    /// Validates the parameters and derives any dependent state.  Structs
    /// holding other `Init` types call `init` on each of them.
    fn init(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Lower-cased file extension of `filepath`, without the leading dot
fn file_format(filepath: &Path) -> anyhow::Result<String> {
    filepath
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .with_context(|| format!("{}\nno file extension in {filepath:?}", format_dbg!()))
}

/// Persistence of brake components, configurations and consists.  Every
/// read runs [Init::init] on the result unless `skip_init` is set, so a
/// deserialized object obeys the same invariants as a constructed one.
pub trait SerdeAPI: Serialize + for<'a> Deserialize<'a> + Init {
    /// File extensions understood by [Self::to_file] and [Self::from_file]
    const ACCEPTED_FILE_FORMATS: &'static [&'static str] = &["yaml", "yml", "json", "bin"];

    /// Writes `self` to `filepath`, in the format named by its extension.
    /// An existing file is truncated.
    fn to_file<P: AsRef<Path>>(&self, filepath: P) -> anyhow::Result<()> {
        let filepath = filepath.as_ref();
        let format = file_format(filepath)?;
        let bytes = match format.as_str() {
            "yaml" | "yml" => self.to_yaml()?.into_bytes(),
            "json" => self.to_json()?.into_bytes(),
            "bin" => self.to_bincode()?,
            _ => bail!(
                "{}\nformat {format:?} not one of {:?}",
                format_dbg!(),
                Self::ACCEPTED_FILE_FORMATS
            ),
        };
        std::fs::write(filepath, bytes).with_context(|| format!("writing {filepath:?}"))
    }

    /// Reads an object from `filepath`, in the format named by its extension
    fn from_file<P: AsRef<Path>>(filepath: P, skip_init: bool) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let format = file_format(filepath)?;
        let mut file = File::open(filepath).with_context(|| format!("opening {filepath:?}"))?;
        Self::from_reader(&mut file, &format, skip_init)
    }

    /// Reads an object from `rdr`.  `format` is one of
    /// [Self::ACCEPTED_FILE_FORMATS].
    fn from_reader<R: std::io::Read>(
        rdr: &mut R,
        format: &str,
        skip_init: bool,
    ) -> anyhow::Result<Self> {
        let mut obj: Self = match format.trim_start_matches('.') {
            "yaml" | "yml" => serde_yaml::from_reader(rdr)?,
            "json" => serde_json::from_reader(rdr)?,
            "bin" => bincode::deserialize_from(rdr)?,
            _ => bail!(
                "{}\nformat {format:?} not one of {:?}",
                format_dbg!(),
                Self::ACCEPTED_FILE_FORMATS
            ),
        };
        if !skip_init {
            obj.init()?;
        }
        Ok(obj)
    }

    fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self)?)
    }

    fn from_json<S: AsRef<str>>(json_str: S, skip_init: bool) -> anyhow::Result<Self> {
        let mut obj: Self = serde_json::from_str(json_str.as_ref())?;
        if !skip_init {
            obj.init()?;
        }
        Ok(obj)
    }

    fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(&self)?)
    }

    fn from_yaml<S: AsRef<str>>(yaml_str: S, skip_init: bool) -> anyhow::Result<Self> {
        let mut obj: Self = serde_yaml::from_str(yaml_str.as_ref())?;
        if !skip_init {
            obj.init()?;
        }
        Ok(obj)
    }

    fn to_bincode(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }

    fn from_bincode(encoded: &[u8], skip_init: bool) -> anyhow::Result<Self> {
        let mut obj: Self = bincode::deserialize(encoded)?;
        if !skip_init {
            obj.init()?;
        }
        Ok(obj)
    }
}

impl<T: Init> Init for Vec<T> {
    fn init(&mut self) -> Result<(), Error> {
        for val in self {
            val.init()?
        }
        Ok(())
    }
}

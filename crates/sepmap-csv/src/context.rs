//! Registry plus dialect: the string, stream and file entry points.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use sepmap_core::{MapperRegistry, RuleSet};

use crate::error::{CsvMapError, Result};
use crate::options::SepOptions;
use crate::reader::CsvRowSource;
use crate::writer::CsvRowSink;

/// A [`MapperRegistry`] bound to one delimited-text dialect.
///
/// All Read variants open a [`CsvRowSource`] and all Write variants open a
/// [`CsvRowSink`], then hand over to the registry.
///
/// ```
/// use sepmap_csv::{SepMapper, SepOptions};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Something {
///     a: String,
/// }
///
/// let mut mapper = SepMapper::new(SepOptions::default())?;
/// mapper.register_class::<Something>()?.add_property(
///     "A",
///     |s: &Something| s.a.clone(),
///     |s: &mut Something, v| s.a = v,
/// )?;
///
/// let items: Vec<Something> = mapper.read_str("A\nraw\n")?;
/// assert_eq!(mapper.write_string(&items)?, "A\nraw\n");
/// # Ok::<(), sepmap_csv::CsvMapError>(())
/// ```
#[derive(Debug, Default)]
pub struct SepMapper {
    registry: MapperRegistry,
    options: SepOptions,
}

impl SepMapper {
    /// Create a mapper with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`CsvMapError::InvalidOptions`] if `options` fail validation.
    pub fn new(options: SepOptions) -> Result<Self> {
        Self::with_registry(MapperRegistry::new(), options)
    }

    /// Create a mapper around an already populated registry.
    pub fn with_registry(registry: MapperRegistry, options: SepOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { registry, options })
    }

    pub fn options(&self) -> &SepOptions {
        &self.options
    }

    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MapperRegistry {
        &mut self.registry
    }

    /// See [`MapperRegistry::register_class`].
    pub fn register_class<T: 'static>(&mut self) -> Result<&mut RuleSet<T>> {
        Ok(self.registry.register_class::<T>()?)
    }

    /// See [`MapperRegistry::unregister_class`].
    pub fn unregister_class<T: 'static>(&mut self) {
        self.registry.unregister_class::<T>();
    }

    // === Read ===

    /// Read instances from delimited text held in memory.
    pub fn read_str<T: Default + 'static>(&self, text: &str) -> Result<Vec<T>> {
        self.read_from(text.as_bytes())
    }

    /// Read instances from any byte stream.
    pub fn read_from<T, R>(&self, input: R) -> Result<Vec<T>>
    where
        T: Default + 'static,
        R: Read,
    {
        let _span = tracing::debug_span!("read", model = std::any::type_name::<T>()).entered();
        let reader = self.options.reader_builder()?.from_reader(input);
        let mut source = CsvRowSource::new(reader).map_err(CsvMapError::Header)?;
        Ok(self.registry.read(&mut source)?)
    }

    /// Read instances from a file.
    pub fn read_path<T: Default + 'static>(&self, path: &Path) -> Result<Vec<T>> {
        let file = File::open(path).map_err(|e| CsvMapError::file(path, e))?;
        self.read_from(file)
    }

    // === Write ===

    /// Write instances and return the delimited text.
    pub fn write_string<T: 'static>(&self, instances: &[T]) -> Result<String> {
        Ok(String::from_utf8(self.render(instances)?)?)
    }

    /// Write instances into `output`, returning it once flushed.
    ///
    /// Nothing reaches `output` unless every row rendered.
    pub fn write_to<T, W>(&self, instances: &[T], mut output: W) -> Result<W>
    where
        T: 'static,
        W: Write,
    {
        let bytes = self.render(instances)?;
        output.write_all(&bytes).map_err(CsvMapError::Output)?;
        output.flush().map_err(CsvMapError::Output)?;
        Ok(output)
    }

    /// Write instances to a file, replacing any existing content.
    ///
    /// The file is only created or truncated once every row rendered, so a
    /// failed call leaves an existing file untouched.
    pub fn write_path<T: 'static>(&self, instances: &[T], path: &Path) -> Result<()> {
        let bytes = self.render(instances)?;
        fs::write(path, bytes).map_err(|e| CsvMapError::file(path, e))
    }

    /// Render the header and all rows into memory.
    fn render<T: 'static>(&self, instances: &[T]) -> Result<Vec<u8>> {
        let _span = tracing::debug_span!("write", model = std::any::type_name::<T>()).entered();
        let writer = self.options.writer_builder()?.from_writer(Vec::new());
        Ok(self.registry.write(instances, CsvRowSink::new(writer))?)
    }
}

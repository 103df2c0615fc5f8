use std::{
    fs,
    io::{
        Cursor,
        Seek,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
};

use serde::Serialize;
use tracing::{
    debug,
    info,
};
use zip::{
    write::SimpleFileOptions,
    CompressionMethod,
    ZipWriter,
};

use super::{
    assets::{
        AssetNamer,
        DataUrl,
    },
    manifest::{
        AssetEntry,
        DataFile,
        Manifest,
        ManifestFields,
        ASSET_DIR,
        MANIFEST_PATH,
    },
};
use crate::core::{
    Course,
    CultureItem,
    LexyError,
};

pub const DEFAULT_AUTHOR: &str = "Lexy User";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub author: String,
    /// Also write `alphabet.json` and `books.json`.
    pub extended: bool,
    pub pretty_json: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { author: DEFAULT_AUTHOR.to_string(), extended: true, pretty_json: true }
    }
}

pub fn bundle_file_name(language: &str) -> String {
    let language = language.trim();
    let stem = if language.is_empty() { "course".to_string() } else { language.to_lowercase() };
    format!("{}_bundle.lexy", stem)
}

enum AssetSlot<'a> {
    Gallery { name: &'a str },
    Thumbnail { item_id: &'a str },
}

struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    namer: AssetNamer,
    manifest: Manifest,
    pretty: bool,
}

impl<W: Write + Seek> PackageWriter<W> {
    fn new(writer: W, manifest: Manifest, pretty: bool) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            namer: AssetNamer::new(),
            manifest,
            pretty,
        }
    }

    fn write_bytes(&mut self, path: &str, bytes: &[u8]) -> Result<(), LexyError> {
        self.zip.start_file(path, self.options)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) -> Result<(), LexyError> {
        let json =
            if self.pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) }?;
        self.write_bytes(path, json.as_bytes())
    }

    fn write_data_file<T: Serialize + ?Sized>(&mut self, kind: DataFile, value: &T) -> Result<(), LexyError> {
        let path = self.manifest.declare_data_file(kind);
        self.write_json(&path, value)
    }

    /// Moves an inline data URL into `assets/` and points `value` at the written file.
    /// Values that are not base64 data URLs are left alone.
    fn externalize(&mut self, value: &mut String, slot: AssetSlot<'_>) -> Result<(), LexyError> {
        let (mime_type, bytes) = match DataUrl::parse(value) {
            Some(data_url) => (data_url.mime_type.to_string(), data_url.decode()?),
            None => return Ok(()),
        };

        let file_name = match slot {
            AssetSlot::Gallery { name } => self.namer.gallery_file_name(name),
            AssetSlot::Thumbnail { item_id } => self.namer.thumbnail_file_name(item_id),
        };
        let path = format!("{}{}", ASSET_DIR, file_name);

        self.write_bytes(&path, &bytes)?;
        debug!("Wrote asset {} ({} bytes, {})", path, bytes.len(), mime_type);

        self.manifest.assets.insert(path.clone(), AssetEntry { mime_type });
        *value = path;
        Ok(())
    }

    fn externalize_culture_assets(&mut self, items: &mut [CultureItem]) -> Result<(), LexyError> {
        for item in items.iter_mut() {
            if let Some(assets) = item.assets.as_mut() {
                for asset in assets.iter_mut() {
                    self.externalize(&mut asset.value, AssetSlot::Gallery { name: &asset.name })?;
                }
            }

            self.externalize(&mut item.thumbnail_url, AssetSlot::Thumbnail { item_id: &item.id })?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<W, LexyError> {
        let manifest = std::mem::replace(&mut self.manifest, Manifest::new(ManifestFields::default(), ""));
        self.write_json(MANIFEST_PATH, &manifest)?;
        Ok(self.zip.finish()?)
    }
}

fn manifest_for(course: &Course, options: &ExportOptions) -> Manifest {
    let title = course.course_title.trim();
    let fields = ManifestFields {
        title: Some(if title.is_empty() { "Untitled Course".to_string() } else { title.to_string() }),
        description: Some(format!("A custom language course for {}", course.language)),
        author: Some(options.author.clone()),
        language: Some(course.language.clone()),
    };
    // The package is keyed by language, matching how courses are identified in the library
    Manifest::new(fields, course.language.clone())
}

/// Serializes a course into `.lexy` archive bytes. The course itself is left untouched;
/// inline culture assets are rewritten on a copy.
pub fn export_course(course: &Course, options: &ExportOptions) -> Result<Vec<u8>, LexyError> {
    let mut culture_items: Vec<CultureItem> = course.culture_items.iter().cloned().collect();

    let mut writer =
        PackageWriter::new(Cursor::new(Vec::new()), manifest_for(course, options), options.pretty_json);

    writer.externalize_culture_assets(&mut culture_items)?;

    writer.write_data_file(DataFile::Dictionary, &course.dictionary)?;
    writer.write_data_file(DataFile::Grammar, &course.grammar)?;
    writer.write_data_file(DataFile::Culture, &culture_items)?;
    writer.write_data_file(DataFile::Units, &course.units)?;
    writer.write_data_file(DataFile::AiChats, &course.ai_characters)?;
    if options.extended {
        writer.write_data_file(DataFile::Alphabet, &course.alphabet)?;
        writer.write_data_file(DataFile::Books, &course.books)?;
    }

    let asset_count = writer.manifest.assets.len();
    let bytes = writer.finish()?.into_inner();

    info!(
        "Exported course '{}' ({} bytes, {} assets)",
        course.language,
        bytes.len(),
        asset_count
    );
    Ok(bytes)
}

/// Writes `<language>_bundle.lexy` into `output_dir` and returns its path.
pub fn export_to_dir(course: &Course, options: &ExportOptions, output_dir: &Path) -> Result<PathBuf, LexyError> {
    let bytes = export_course(course, options)?;
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(bundle_file_name(&course.language));
    fs::write(&path, bytes)?;
    info!("Saved package to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_file_name() {
        assert_eq!(bundle_file_name("Spanish"), "spanish_bundle.lexy");
        assert_eq!(bundle_file_name("Brazilian Portuguese"), "brazilian portuguese_bundle.lexy");
        assert_eq!(bundle_file_name("  "), "course_bundle.lexy");
    }

    #[test]
    fn test_untitled_course_manifest() {
        let course = Course::new("", "German");
        let manifest = manifest_for(&course, &ExportOptions::default());

        assert_eq!(manifest.fields.title.as_deref(), Some("Untitled Course"));
        assert_eq!(manifest.fields.description.as_deref(), Some("A custom language course for German"));
        assert_eq!(manifest.fields.author.as_deref(), Some(DEFAULT_AUTHOR));
        assert_eq!(manifest.declared_course_id(), Some("German"));
    }
}

use std::{
    collections::HashMap,
    fs::File,
    io::{
        BufReader,
        Cursor,
        Read,
        Seek,
    },
    path::Path,
};

use serde::de::DeserializeOwned;
use tracing::{
    debug,
    info,
    warn,
};
use uuid::Uuid;
use zip::{
    result::ZipError,
    ZipArchive,
};

use super::{
    assets::{
        guess_mime_type,
        to_data_url,
    },
    manifest::{
        DataFile,
        Manifest,
        ASSET_DIR,
        MANIFEST_PATH,
        PACKAGE_VERSION,
    },
};
use crate::core::{
    Course,
    CultureItem,
    LexyError,
    Record,
    Repository,
};

/// A course rebuilt from a package, with its assets inlined again.
#[derive(Debug, Clone)]
pub struct ImportedPackage {
    pub course: Course,
    pub manifest: Manifest,
    /// Package path -> data URL for every asset that was re-inlined.
    pub media_map: HashMap<String, String>,
}

struct PackageReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> PackageReader<R> {
    fn open(reader: R) -> Result<Self, LexyError> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| LexyError::Format(format!("not a readable archive ({})", e)))?;
        Ok(Self { archive })
    }

    fn read_bytes(&mut self, path: &str) -> Result<Option<Vec<u8>>, LexyError> {
        match self.archive.by_name(path) {
            Ok(mut file) => {
                let mut buffer = Vec::new();
                file.read_to_end(&mut buffer)?;
                Ok(Some(buffer))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_manifest(&mut self) -> Result<Manifest, LexyError> {
        let content = self
            .read_bytes(MANIFEST_PATH)?
            .ok_or_else(|| LexyError::Format(format!("{} not found", MANIFEST_PATH)))?;

        let manifest: Manifest =
            serde_json::from_slice(&content).map_err(|e| LexyError::parse(MANIFEST_PATH, e))?;

        if !manifest.is_lexy_package() {
            return Err(LexyError::Format("this is not a Lexy package".to_string()));
        }
        if manifest.version > PACKAGE_VERSION {
            warn!(
                "Package version {} is newer than supported version {}; reading what we can",
                manifest.version, PACKAGE_VERSION
            );
        }

        Ok(manifest)
    }

    /// Loads one declared data document. Undeclared or absent documents are empty.
    fn load_section<T>(&mut self, manifest: &Manifest, kind: DataFile) -> Result<Repository<T>, LexyError>
    where
        T: DeserializeOwned + Record,
    {
        let Some(path) = manifest.data_file_path(kind) else {
            debug!("Package declares no '{}' data file", kind.key());
            return Ok(Repository::default());
        };

        let Some(content) = self.read_bytes(path)? else {
            warn!("Declared data file {} is missing from the package", path);
            return Ok(Repository::default());
        };

        serde_json::from_slice(&content).map_err(|e| LexyError::parse(path, e))
    }

    /// Replaces a package-relative asset path with a data URL when the file is present.
    fn inline_asset(
        &mut self,
        manifest: &Manifest,
        value: &mut String,
        media_map: &mut HashMap<String, String>,
    ) -> Result<(), LexyError> {
        if !value.starts_with(ASSET_DIR) {
            return Ok(());
        }

        let Some(bytes) = self.read_bytes(value)? else {
            warn!("Asset {} referenced but not found in package", value);
            return Ok(());
        };

        let mime_type = manifest.asset_mime_type(value).unwrap_or_else(|| guess_mime_type(value));
        let data_url = to_data_url(mime_type, &bytes);
        debug!("Inlined asset {} ({} bytes)", value, bytes.len());

        media_map.insert(std::mem::replace(value, data_url.clone()), data_url);
        Ok(())
    }

    fn inline_culture_assets(
        &mut self,
        manifest: &Manifest,
        items: &mut Repository<CultureItem>,
    ) -> Result<HashMap<String, String>, LexyError> {
        let mut media_map = HashMap::new();

        for item in items.iter_mut() {
            self.inline_asset(manifest, &mut item.thumbnail_url, &mut media_map)?;

            if let Some(assets) = item.assets.as_mut() {
                for asset in assets.iter_mut() {
                    self.inline_asset(manifest, &mut asset.value, &mut media_map)?;
                }
            }
        }

        Ok(media_map)
    }
}

/// Reads a `.lexy` archive into a course. Nothing outside the returned value is touched,
/// so a failure here never leaves partial state behind.
pub fn load_package<R: Read + Seek>(reader: R) -> Result<ImportedPackage, LexyError> {
    let mut package = PackageReader::open(reader)?;
    let manifest = package.read_manifest()?;

    let dictionary = package.load_section(&manifest, DataFile::Dictionary)?;
    let grammar = package.load_section(&manifest, DataFile::Grammar)?;
    let mut culture_items = package.load_section(&manifest, DataFile::Culture)?;
    let units = package.load_section(&manifest, DataFile::Units)?;
    let ai_characters = package.load_section(&manifest, DataFile::AiChats)?;
    let alphabet = package.load_section(&manifest, DataFile::Alphabet)?;
    let books = package.load_section(&manifest, DataFile::Books)?;

    let media_map = package.inline_culture_assets(&manifest, &mut culture_items)?;

    let id = manifest
        .declared_course_id()
        .map(str::to_string)
        .unwrap_or_else(|| format!("course-{}", Uuid::new_v4().simple()));

    let language = manifest
        .fields
        .language
        .clone()
        .filter(|l| !l.trim().is_empty())
        .or_else(|| manifest.declared_course_id().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string());

    let course_title = manifest
        .fields
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Imported Course".to_string());

    let course = Course {
        id,
        course_title,
        language,
        units,
        alphabet,
        dictionary,
        grammar,
        books,
        culture_items,
        ai_characters,
    };

    info!(
        "Loaded package for '{}': {} units, {} dictionary entries, {} assets",
        course.id,
        course.units.len(),
        course.dictionary.len(),
        media_map.len()
    );

    Ok(ImportedPackage { course, manifest, media_map })
}

pub fn load_package_bytes(bytes: &[u8]) -> Result<ImportedPackage, LexyError> {
    load_package(Cursor::new(bytes))
}

pub fn load_package_file(path: &Path) -> Result<ImportedPackage, LexyError> {
    let file = File::open(path)?;
    load_package(BufReader::new(file))
}

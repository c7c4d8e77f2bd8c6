//! `package_manifest.js` for the front end.
//!
//! The file declares three constants:
//! - `PACKAGE_MANIFEST`: package → word id → image file names
//! - `AUDIO_MANIFEST`: feedback sound file names under the assets root
//! - `CHARACTER_MANIFEST`: character folders under the assets root that carry an `idle.png`

use super::extract::classify::FileKind;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "package_manifest.js";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

pub type WordImages = BTreeMap<String, Vec<String>>;
pub type PackageManifest = BTreeMap<String, WordImages>;

/// Sound files grouped the way the front end plays them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioManifest {
    pub posi: Vec<String>,
    pub neg: Vec<String>,
    pub cat: Vec<String>,
}

/// Everything written to `package_manifest.js`.
#[derive(Debug, Clone, Default)]
pub struct FrontEndManifest {
    pub packages: PackageManifest,
    pub audio: AudioManifest,
    pub characters: Vec<String>,
}

/// Sorted names of the regular files in `dir` accepted by `keep`; empty if `dir` is missing.
fn file_names(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|file| file.path().is_file())
        .map(|file| file.file_name().to_string_lossy().into_owned())
        .filter(|name| keep(name.as_str()))
        .collect();
    names.sort();
    Ok(names)
}

fn is_mp3(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
}

/// List the images of every word folder in `package`; folders without images are left out.
pub fn scan_package(package: &Path) -> Result<WordImages> {
    let mut words = WordImages::new();

    for entry in fs::read_dir(package)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let images = file_names(&path, |name| FileKind::of(name) == Some(FileKind::Image))?;
        if !images.is_empty() {
            words.insert(entry.file_name().to_string_lossy().into_owned(), images);
        }
    }

    Ok(words)
}

/// Build the manifest for every package directory that exists.
pub fn build_manifest<P: AsRef<Path>>(packages: &[P]) -> Result<PackageManifest> {
    let mut manifest = PackageManifest::new();

    for package in packages {
        let package = package.as_ref();
        if !package.is_dir() {
            log::warn!("Skipping missing package: {}", package.display());
            continue;
        }

        let name = package
            .file_name()
            .map_or_else(|| package.to_string_lossy(), |n| n.to_string_lossy())
            .into_owned();
        let words = scan_package(package)?;
        log::debug!("Package {name}: {} words with images", words.len());
        manifest.insert(name, words);
    }

    Ok(manifest)
}

/// MP3 files under `<assets>/audio/human/posi`, `<assets>/audio/human/neg`, and `<assets>/audio/cat`.
pub fn scan_audio(assets: &Path) -> Result<AudioManifest> {
    let audio = assets.join("audio");
    Ok(AudioManifest {
        posi: file_names(&audio.join("human").join("posi"), is_mp3)?,
        neg: file_names(&audio.join("human").join("neg"), is_mp3)?,
        cat: file_names(&audio.join("cat"), is_mp3)?,
    })
}

/// Folders of `<assets>/img` holding an `idle.png`, sorted.
pub fn scan_characters(assets: &Path) -> Result<Vec<String>> {
    let img = assets.join("img");
    if !img.is_dir() {
        return Ok(Vec::new());
    }

    let mut characters = Vec::new();
    for entry in fs::read_dir(&img)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && path.join("idle.png").exists() {
            characters.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    characters.sort();
    Ok(characters)
}

/// Render the three JavaScript constant declarations.
pub fn render_manifest(manifest: &FrontEndManifest) -> Result<String> {
    let packages = serde_json::to_string_pretty(&manifest.packages)?;
    let audio = serde_json::to_string_pretty(&manifest.audio)?;
    let characters = serde_json::to_string_pretty(&manifest.characters)?;

    Ok(format!(
        "const PACKAGE_MANIFEST = {packages};\n\n\
         const AUDIO_MANIFEST = {audio};\n\n\
         const CHARACTER_MANIFEST = {characters};\n"
    ))
}

/// Build, render, and write the manifest; returns the number of packages included.
pub fn write_manifest<P: AsRef<Path>>(
    packages: &[P],
    assets: &Path,
    output: &Path,
) -> Result<usize> {
    if !assets.is_dir() {
        log::warn!(
            "Assets directory {} not found, audio and character lists will be empty",
            assets.display()
        );
    }

    let manifest = FrontEndManifest {
        packages: build_manifest(packages)?,
        audio: scan_audio(assets)?,
        characters: scan_characters(assets)?,
    };
    fs::write(output, render_manifest(&manifest)?)?;
    log::info!(
        "Wrote {} packages, {} characters to {}",
        manifest.packages.len(),
        manifest.characters.len(),
        output.display()
    );
    Ok(manifest.packages.len())
}

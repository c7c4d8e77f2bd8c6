//! Writing retained files into the destination tree.
//!
//! Every write is a streamed copy into `<dir>/<file_name>`, creating `dir`
//! on demand. Existing files are overwritten, so re-running an extraction
//! into the same destination converges on the same file set.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Stream `reader` into `dir/file_name`, returning the number of bytes written.
pub fn write_stream<R: Read + ?Sized>(
    reader: &mut R,
    dir: &Path,
    file_name: &str,
) -> io::Result<u64> {
    fs::create_dir_all(dir)?;

    let out_path = dir.join(file_name);
    let mut writer = BufWriter::new(File::create(&out_path)?);
    let written = io::copy(reader, &mut writer)?;
    writer.flush()?;

    log::trace!("Wrote {} ({written} bytes)", out_path.display());
    Ok(written)
}

/// Copy the file at `src` into `dir/file_name`.
pub fn copy_file(src: &Path, dir: &Path, file_name: &str) -> io::Result<u64> {
    fs::create_dir_all(dir)?;
    fs::copy(src, dir.join(file_name))
}

/// Recursively copy the directory tree at `src` to `dst`.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<u64> {
    fs::create_dir_all(dst)?;
    let mut total = 0u64;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());

        if file_type.is_dir() {
            total += copy_dir_recursive(&entry.path(), &target)?;
        } else if file_type.is_file() {
            total += fs::copy(entry.path(), &target)?;
        }
    }

    Ok(total)
}

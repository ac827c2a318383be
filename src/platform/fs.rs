// logcleave - platform/fs.rs
//
// Filesystem read helpers shared by the app layer.

use crate::util::constants;
use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// Files above the large-file threshold are read through a memory map so the
/// raw bytes are not buffered twice. Invalid UTF-8 is converted lossily in
/// both paths; block routing only ever inspects the lines it can read.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let size = std::fs::metadata(path)?.len();
    if size >= constants::LARGE_FILE_THRESHOLD {
        read_large_file(path)
    } else {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Read via `memmap2` for large files (avoids allocating the full buffer
/// ahead of the UTF-8 pass).
fn read_large_file(path: &Path) -> io::Result<String> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the file is read-only and we do not mutate the map.
    // We accept the documented risk that external modification of the file
    // during the map's lifetime could produce undefined behaviour, which is
    // acceptable for a tool reading already-closed log files.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

use std::io;
use std::path::Path;

use windows::Win32::Storage::FileSystem::{FILE_ATTRIBUTE_HIDDEN, SetFileAttributesW};
use windows::core::HSTRING;

/// Marks a file hidden in Explorer.
pub fn set_hidden(path: &Path) -> io::Result<()> {
    let wide = HSTRING::from(path);

    // SAFETY: SetFileAttributesW reads the null-terminated path.
    unsafe { SetFileAttributesW(&wide, FILE_ATTRIBUTE_HIDDEN)? };
    Ok(())
}

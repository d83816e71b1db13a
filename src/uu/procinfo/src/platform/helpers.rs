// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

/// Convert a fixed-size C character array to a Rust String
///
/// Stops at the first NUL, or at the end of the array when the platform filled
/// it completely.
#[cfg(target_os = "macos")]
pub fn c_chars_to_string(chars: &[libc::c_char]) -> String {
    let bytes = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect::<Vec<_>>();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Convert a fixed-size wide character array to a Rust String
#[cfg(target_os = "windows")]
pub fn wide_to_string(units: &[u16]) -> String {
    let len = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..len])
}

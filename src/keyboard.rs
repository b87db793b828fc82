//! Computer-keyboard piano layout
//!
//! Home row plays the white keys from C4 to C5, the row above plays sharps.

/// A playable key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
    pub key: char,
    pub note: &'static str,
    pub frequency: f64,
    pub sharp: bool,
}

const fn key(key: char, note: &'static str, frequency: f64, sharp: bool) -> Key {
    Key {
        key,
        note,
        frequency,
        sharp,
    }
}

/// Keys in pitch order.
pub const KEYMAP: [Key; 13] = [
    key('a', "C", 261.63, false),
    key('w', "C#", 277.18, true),
    key('s', "D", 293.66, false),
    key('e', "D#", 311.13, true),
    key('d', "E", 329.63, false),
    key('f', "F", 349.23, false),
    key('t', "F#", 369.99, true),
    key('g', "G", 392.00, false),
    key('y', "G#", 415.30, true),
    key('h', "A", 440.00, false),
    key('u', "A#", 466.16, true),
    key('j', "B", 493.88, false),
    key('k', "C5", 523.25, false),
];

/// Look up the key bound to `c` (case-insensitive)
pub fn lookup(c: char) -> Option<&'static Key> {
    let c = c.to_ascii_lowercase();
    KEYMAP.iter().find(|k| k.key == c)
}

/// Look up a key by note name
pub fn by_note(name: &str) -> Option<&'static Key> {
    KEYMAP.iter().find(|k| k.note.eq_ignore_ascii_case(name))
}

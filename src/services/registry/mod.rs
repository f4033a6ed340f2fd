//! Static console registry: request codes → repository system names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::errors::{ResolveError, ResolveResult};

/// Thumbnail categories the repository serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailKind {
    Boxart,
    Snap,
    Title,
}

impl ThumbnailKind {
    /// Repository folder holding this category's images.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Boxart => "Named_Boxarts",
            Self::Snap => "Named_Snaps",
            Self::Title => "Named_Titles",
        }
    }

    /// Request key for this category.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Boxart => "boxart",
            Self::Snap => "snap",
            Self::Title => "title",
        }
    }

    /// Attempt to resolve from a request key (e.g. "boxart").
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "boxart" => Some(Self::Boxart),
            "snap" => Some(Self::Snap),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

impl std::fmt::Display for ThumbnailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// One supported console: request code plus its repository system name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSpec {
    pub code: &'static str,
    pub system_name: &'static str,
    pub categories: &'static [ThumbnailKind],
}

const ALL_KINDS: &[ThumbnailKind] = &[
    ThumbnailKind::Boxart,
    ThumbnailKind::Snap,
    ThumbnailKind::Title,
];

/// Console code → repository system name. Codes are uppercase and unique;
/// several codes alias the same system (e.g. GBA / MGBA). Adding a console
/// is a data change here, nothing else.
const CONSOLES: &[(&str, &str)] = &[
    ("PUAE", "Commodore - Amiga"),
    ("AMIGA", "Commodore - Amiga"),
    ("FBN", "FBNeo - Arcade Games"),
    ("CPC", "Amstrad - CPC"),
    ("ATARI", "Atari - 2600"),
    ("FIFTYTWOHUNDRED", "Atari - 5200"),
    ("LYNX", "Atari - Lynx"),
    ("COLECO", "Coleco - ColecoVision"),
    ("C64", "Commodore - 64"),
    ("COMMODORE", "Commodore - 64"),
    ("DOS", "DOS"),
    ("DOOM", "DOOM"),
    ("FDS", "Family Computer Disk System"),
    ("GB", "Nintendo - Game Boy"),
    ("GBA", "Nintendo - Game Boy Advance"),
    ("MGBA", "Nintendo - Game Boy Advance"),
    ("GBC", "Nintendo - Game Boy Color"),
    ("INTELLIVISION", "Mattel - Intellivision"),
    ("MSX", "Microsoft - MSX"),
    ("NEOCD", "SNK - Neo Geo CD"),
    ("NGPC", "SNK - Neo Geo Pocket Color"),
    ("NEOGEO", "SNK - Neo Geo"),
    ("N64", "Nintendo - Nintendo 64"),
    ("NDS", "Nintendo - Nintendo DS"),
    ("FC", "Nintendo - Nintendo Entertainment System"),
    ("ODYSSEY", "Magnavox - Odyssey 2"),
    ("PKM", "Nintendo - Pokemon Mini"),
    ("QUAKE", "Quake"),
    ("SCUMMVM", "ScummVM"),
    ("THIRTYTWOX", "Sega - 32X"),
    ("DC", "Sega - Dreamcast"),
    ("GG", "Sega - Game Gear"),
    ("MD", "Sega - Mega Drive - Genesis"),
    ("SMS", "Sega - Master System - Mark III"),
    ("SATURN", "Sega - Saturn"),
    ("PS", "Sony - PlayStation"),
    ("PSP", "Sony - PlayStation Portable"),
    ("SGFX", "NEC - PC Engine SuperGrafx"),
    ("SFC", "Nintendo - Super Nintendo Entertainment System"),
    ("SUPA", "Nintendo - Super Nintendo Entertainment System"),
    ("TIC", "TIC-80"),
    ("PCE", "NEC - PC Engine - TurboGrafx 16"),
    ("VIC20", "Commodore - VIC-20"),
    ("VB", "Nintendo - Virtual Boy"),
    ("SUPERVISION", "Watara - Supervision"),
    ("WSC", "Bandai - WonderSwan Color"),
    ("X68000", "Sharp - X68000"),
];

/// Case-insensitive console lookup over the static table.
#[derive(Debug)]
pub struct ConsoleRegistry {
    by_code: HashMap<&'static str, ConsoleSpec>,
}

impl ConsoleRegistry {
    pub fn new() -> Self {
        let by_code = CONSOLES
            .iter()
            .map(|&(code, system_name)| {
                (
                    code,
                    ConsoleSpec {
                        code,
                        system_name,
                        categories: ALL_KINDS,
                    },
                )
            })
            .collect();

        Self { by_code }
    }

    /// Look up a console by code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&ConsoleSpec> {
        self.by_code.get(code.to_ascii_uppercase().as_str())
    }

    /// Validate a (console, category) request pair.
    ///
    /// Fails with `UnknownConsole` for a code absent from the table, and with
    /// `UnknownCategory` for a category the console does not serve. Never
    /// touches the network or the cache.
    pub fn resolve(
        &self,
        code: &str,
        category: &str,
    ) -> ResolveResult<(&ConsoleSpec, ThumbnailKind)> {
        let spec = self
            .get(code)
            .ok_or_else(|| ResolveError::UnknownConsole(code.to_string()))?;

        let kind = ThumbnailKind::from_key(category)
            .filter(|kind| spec.categories.contains(kind))
            .ok_or_else(|| ResolveError::UnknownCategory {
                console: spec.code.to_string(),
                category: category.to_string(),
            })?;

        Ok((spec, kind))
    }
}

impl Default for ConsoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;

//! Application identifiers and their static metadata.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppId {
    FileNexus,
    NemeDocs,
    NemeSheets,
    NemeSlides,
    NemePlayer,
    NemeCalc,
    NemeCalendar,
    NemeNotes,
    NemeTerm,
    NemeWeb,
    NemeSettings,
}

impl AppId {
    /// Every application, in start-menu order.
    pub const ALL: [AppId; 11] = [
        AppId::FileNexus,
        AppId::NemeDocs,
        AppId::NemeSheets,
        AppId::NemeSlides,
        AppId::NemePlayer,
        AppId::NemeCalc,
        AppId::NemeCalendar,
        AppId::NemeNotes,
        AppId::NemeTerm,
        AppId::NemeWeb,
        AppId::NemeSettings,
    ];

    /// Applications with a shortcut on the desktop.
    pub const DESKTOP_ICONS: [AppId; 5] = [
        AppId::FileNexus,
        AppId::NemeDocs,
        AppId::NemeTerm,
        AppId::NemeSettings,
        AppId::NemeWeb,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            AppId::FileNexus => "filenexus",
            AppId::NemeDocs => "nemodocs",
            AppId::NemeSheets => "nemesheets",
            AppId::NemeSlides => "nemeslides",
            AppId::NemePlayer => "nemeplayer",
            AppId::NemeCalc => "nemecalc",
            AppId::NemeCalendar => "nemecalendar",
            AppId::NemeNotes => "nemenotes",
            AppId::NemeTerm => "nemeterm",
            AppId::NemeWeb => "nemeweb",
            AppId::NemeSettings => "nemesettings",
        }
    }

    /// Metadata from the built-in table.
    pub fn metadata(self) -> &'static AppMetadata {
        // BUILTIN_APPS is declared in the same order as the enum.
        &BUILTIN_APPS[self as usize]
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application `{0}`")]
pub struct ParseAppIdError(pub String);

impl FromStr for AppId {
    type Err = ParseAppIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        AppId::ALL
            .into_iter()
            .find(|app| {
                app.tag().eq_ignore_ascii_case(needle)
                    || app.metadata().display_name.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ParseAppIdError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub id: AppId,
    pub display_name: &'static str,
    pub icon_glyph: &'static str,
    pub accent_color: (u8, u8, u8),
    pub description: &'static str,
    /// Pinned applications live on the taskbar and never have more than one
    /// window.
    pub pinned: bool,
}

static BUILTIN_APPS: [AppMetadata; 11] = [
    AppMetadata {
        id: AppId::FileNexus,
        display_name: "FileNexus",
        icon_glyph: "▤",
        accent_color: (0x00, 0xD4, 0xFF),
        description: "Advanced file manager",
        pinned: true,
    },
    AppMetadata {
        id: AppId::NemeDocs,
        display_name: "NemeDocs",
        icon_glyph: "✎",
        accent_color: (0x6C, 0x00, 0xFF),
        description: "Markdown word processor",
        pinned: true,
    },
    AppMetadata {
        id: AppId::NemeSheets,
        display_name: "NemeSheets",
        icon_glyph: "▦",
        accent_color: (0x4A, 0xDE, 0x80),
        description: "Smart spreadsheet",
        pinned: false,
    },
    AppMetadata {
        id: AppId::NemeSlides,
        display_name: "NemeSlides",
        icon_glyph: "▭",
        accent_color: (0xFA, 0xCC, 0x15),
        description: "Presentation builder",
        pinned: false,
    },
    AppMetadata {
        id: AppId::NemePlayer,
        display_name: "NemePlayer",
        icon_glyph: "♫",
        accent_color: (0xF4, 0x72, 0xB6),
        description: "Neon media player",
        pinned: false,
    },
    AppMetadata {
        id: AppId::NemeCalc,
        display_name: "NemeCalc",
        icon_glyph: "±",
        accent_color: (0xA7, 0x8B, 0xFA),
        description: "Scientific calculator",
        pinned: false,
    },
    AppMetadata {
        id: AppId::NemeCalendar,
        display_name: "NemeCalendar",
        icon_glyph: "▣",
        accent_color: (0xFB, 0x71, 0x85),
        description: "Interactive calendar",
        pinned: false,
    },
    AppMetadata {
        id: AppId::NemeNotes,
        display_name: "NemeNotes",
        icon_glyph: "✐",
        accent_color: (0xFD, 0xE0, 0x47),
        description: "Quick notes",
        pinned: false,
    },
    AppMetadata {
        id: AppId::NemeTerm,
        display_name: "NemeTerm",
        icon_glyph: "❯",
        accent_color: (0xFF, 0xFF, 0xFF),
        description: "Cyberpunk terminal",
        pinned: true,
    },
    AppMetadata {
        id: AppId::NemeWeb,
        display_name: "NemeWeb",
        icon_glyph: "◍",
        accent_color: (0x60, 0xA5, 0xFA),
        description: "Secure browser",
        pinned: true,
    },
    AppMetadata {
        id: AppId::NemeSettings,
        display_name: "Settings",
        icon_glyph: "⚙",
        accent_color: (0x94, 0xA3, 0xB8),
        description: "System configuration",
        pinned: false,
    },
];

/// Read-only source of application metadata, consulted when a window is
/// created and when launchers are drawn.
pub trait AppCatalog: fmt::Debug {
    fn metadata(&self, app: AppId) -> Option<&AppMetadata>;

    fn is_pinned(&self, app: AppId) -> bool {
        self.metadata(app).is_some_and(|meta| meta.pinned)
    }

    /// Pinned applications in taskbar order.
    fn pinned(&self) -> Vec<AppId> {
        AppId::ALL
            .into_iter()
            .filter(|app| self.is_pinned(*app))
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl AppCatalog for BuiltinCatalog {
    fn metadata(&self, app: AppId) -> Option<&AppMetadata> {
        Some(app.metadata())
    }
}

//! Display strings for each supported language.

use std::fmt;

use serde::Deserialize;

/// Languages the interface can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    French,
    Russian,
}

/// The label set for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strings {
    pub title: &'static str,
    pub upload: &'static str,
    pub choose_image: &'static str,
    pub accepted_types: &'static str,
    pub convert: &'static str,
    pub converting: &'static str,
    pub select_first: &'static str,
    pub blocks_label: &'static str,
    pub help: &'static str,
    pub help_text: &'static str,
    pub download: &'static str,
    pub ready: &'static str,
    pub disabled: &'static str,
    pub current_state: &'static str,
    pub language_label: &'static str,
}

const ENGLISH: Strings = Strings {
    title: "MinecraftIMG",
    upload: "Upload Image",
    choose_image: "Choose an image",
    accepted_types: "PNG, JPG, JPEG",
    convert: "Convert",
    converting: "Converting...",
    select_first: "Select an image first",
    blocks_label: "Number of horizontal blocks",
    help: "Help",
    help_text: "Upload an image, choose the number of blocks, and download the Minecraft-style result.",
    download: "Download",
    ready: "ready",
    disabled: "disabled",
    current_state: "current state",
    language_label: "Language",
};

const FRENCH: Strings = Strings {
    title: "MinecraftIMG",
    upload: "Téléverser une image",
    choose_image: "Choisir une image",
    accepted_types: "PNG, JPG, JPEG",
    convert: "Convertir",
    converting: "Conversion...",
    select_first: "Choisissez d'abord une image",
    blocks_label: "Nombre de blocs horizontaux",
    help: "Aide",
    help_text: "Téléversez une image, choisissez le nombre de blocs, puis téléchargez le résultat.",
    download: "Télécharger",
    ready: "prêt",
    disabled: "désactivé",
    current_state: "état actuel",
    language_label: "Langue",
};

const RUSSIAN: Strings = Strings {
    title: "MinecraftIMG",
    upload: "Загрузить изображение",
    choose_image: "Выбрать картинку",
    accepted_types: "PNG, JPG, JPEG",
    convert: "Преобразовать",
    converting: "Преобразование...",
    select_first: "Сначала выберите изображение",
    blocks_label: "Количество блоков по горизонтали",
    help: "Помощь",
    help_text: "Загрузите изображение, выберите количество блоков и скачайте результат.",
    download: "Закачать",
    ready: "готово",
    disabled: "недоступно",
    current_state: "текущее состояние",
    language_label: "Язык",
};

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::French, Language::Russian];

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::English => &ENGLISH,
            Language::French => &FRENCH,
            Language::Russian => &RUSSIAN,
        }
    }

    /// Name of the language in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "Français",
            Language::Russian => "Русский",
        }
    }

    /// Parse a key as typed in the shell: `english`, `en`, `fr`, ...
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "english" | "en" => Some(Language::English),
            "french" | "fr" | "français" | "francais" => Some(Language::French),
            "russian" | "ru" | "русский" => Some(Language::Russian),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

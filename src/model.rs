//! Entités persistées. Les noms de champs sur le fil reprennent ceux du document
//! existant (clés italiennes), d'où les `#[serde(rename)]`.

use crate::grid::Grid;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifiant fort pour Template
    TemplateId
);
string_id!(
    /// Identifiant fort pour TimePreset
    PresetId
);
string_id!(
    /// Identifiant fort pour GeneratedShift
    ShiftId
);

/// Niveau d'administration (0 utilisateur, 1 manager, 2 boss).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum AdminLevel {
    #[default]
    User,
    Manager,
    Boss,
}

impl AdminLevel {
    pub const ALL: [AdminLevel; 3] = [AdminLevel::User, AdminLevel::Manager, AdminLevel::Boss];

    /// Clé de rôle dans la matrice d'accès ("0", "1", "2").
    pub fn role_key(self) -> String {
        u8::from(self).to_string()
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminLevel::User => "Collaboratore",
            AdminLevel::Manager => "Manager",
            AdminLevel::Boss => "Boss",
        }
    }
}

impl From<u8> for AdminLevel {
    fn from(v: u8) -> Self {
        match v {
            0 => AdminLevel::User,
            1 => AdminLevel::Manager,
            _ => AdminLevel::Boss,
        }
    }
}

impl From<AdminLevel> for u8 {
    fn from(level: AdminLevel) -> Self {
        match level {
            AdminLevel::User => 0,
            AdminLevel::Manager => 1,
            AdminLevel::Boss => 2,
        }
    }
}

/// Poste de travail ; pilote la couleur des barres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    #[serde(rename = "sala")]
    Floor,
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "cucina")]
    Kitchen,
}

impl Position {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sala" | "floor" => Some(Position::Floor),
            "bar" => Some(Position::Bar),
            "cucina" | "kitchen" => Some(Position::Kitchen),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Floor => "sala",
            Position::Bar => "bar",
            Position::Kitchen => "cucina",
        }
    }

    /// Ordre d'affichage dans la vue d'un planning : cuisine, salle, bar.
    pub fn display_rank(self) -> u8 {
        match self {
            Position::Kitchen => 0,
            Position::Floor => 1,
            Position::Bar => 2,
        }
    }
}

/// Collaborateur ; `username` sert de clé de ligne dans les grilles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "cognome", default)]
    pub surname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "collaboratore", default)]
    pub is_collaborator: bool,
    #[serde(rename = "livelloAmministrazione", default, deserialize_with = "loose_admin_level")]
    pub admin_level: AdminLevel,
    #[serde(rename = "tipoContratto", default)]
    pub contract_type: String,
    #[serde(rename = "oreContratto", default, deserialize_with = "loose_number")]
    pub contract_hours: f64,
    #[serde(rename = "posizione", default)]
    pub position: Position,
    #[serde(rename = "informazioniAggiuntive", default)]
    pub notes: String,
}

/// Nombre ou texte numérique ; `""`, `null` et texte illisible valent 0.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

fn loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Number(n)) => n,
        Some(LooseNumber::Text(s)) => s
            .trim()
            .replace(',', ".")
            .parse()
            .ok()
            .filter(|n: &f64| n.is_finite())
            .unwrap_or(0.0),
        None => 0.0,
    })
}

fn loose_admin_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AdminLevel, D::Error> {
    let level = loose_number(deserializer)?;
    // NaN et négatifs saturent à 0
    Ok(AdminLevel::from(level.clamp(0.0, 2.0) as u8))
}

impl Collaborator {
    pub fn new<N: Into<String>, S: Into<String>, U: Into<String>>(
        name: N,
        surname: S,
        username: U,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            username: username.into(),
            is_collaborator: true,
            contract_type: "full-time".to_string(),
            contract_hours: 40.0,
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    /// "Mario R." ; repli sur le username.
    pub fn short_name(&self) -> String {
        if self.name.is_empty() {
            return self.username.clone();
        }
        match self.surname.chars().next() {
            Some(initial) => format!("{} {}.", self.name, initial),
            None => self.name.clone(),
        }
    }
}

/// Horaire réutilisable (un ou deux segments).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimePreset {
    pub id: PresetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub in1: String,
    #[serde(default)]
    pub out1: String,
    #[serde(default)]
    pub in2: String,
    #[serde(default)]
    pub out2: String,
}

impl TimePreset {
    pub fn label(&self) -> String {
        let mut out = format!("{}-{}", self.in1, self.out1);
        if !self.in2.is_empty() && !self.out2.is_empty() {
            out.push_str(&format!(" / {}-{}", self.in2, self.out2));
        }
        match &self.name {
            Some(name) if !name.is_empty() => format!("{name} ({out})"),
            _ => out,
        }
    }
}

impl Default for PresetId {
    fn default() -> Self {
        Self::random()
    }
}

/// Jour de la semaine, clé de colonne des grilles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Lunedi,
    Martedi,
    Mercoledi,
    Giovedi,
    Venerdi,
    Sabato,
    Domenica,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        DayKey::Lunedi,
        DayKey::Martedi,
        DayKey::Mercoledi,
        DayKey::Giovedi,
        DayKey::Venerdi,
        DayKey::Sabato,
        DayKey::Domenica,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayKey::Lunedi => "lunedi",
            DayKey::Martedi => "martedi",
            DayKey::Mercoledi => "mercoledi",
            DayKey::Giovedi => "giovedi",
            DayKey::Venerdi => "venerdi",
            DayKey::Sabato => "sabato",
            DayKey::Domenica => "domenica",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s || d.short_label().eq_ignore_ascii_case(&s))
    }

    pub fn label(self) -> &'static str {
        match self {
            DayKey::Lunedi => "Lunedì",
            DayKey::Martedi => "Martedì",
            DayKey::Mercoledi => "Mercoledì",
            DayKey::Giovedi => "Giovedì",
            DayKey::Venerdi => "Venerdì",
            DayKey::Sabato => "Sabato",
            DayKey::Domenica => "Domenica",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            DayKey::Lunedi => "Lun",
            DayKey::Martedi => "Mar",
            DayKey::Mercoledi => "Mer",
            DayKey::Giovedi => "Gio",
            DayKey::Venerdi => "Ven",
            DayKey::Sabato => "Sab",
            DayKey::Domenica => "Dom",
        }
    }

    /// Position dans la semaine, lundi = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        Self::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journée d'une ligne : jusqu'à deux segments "HH:MM" (vides si absents).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayCell {
    #[serde(default)]
    pub in1: String,
    #[serde(default)]
    pub out1: String,
    #[serde(default)]
    pub in2: String,
    #[serde(default)]
    pub out2: String,
    #[serde(rename = "ruolo", default)]
    pub role: String,
}

/// Champ horaire d'une cellule, pour l'édition directe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    In1,
    Out1,
    In2,
    Out2,
    Role,
}

impl CellField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in1" => Some(CellField::In1),
            "out1" => Some(CellField::Out1),
            "in2" => Some(CellField::In2),
            "out2" => Some(CellField::Out2),
            "role" | "ruolo" => Some(CellField::Role),
            _ => None,
        }
    }

    pub fn is_time(self) -> bool {
        !matches!(self, CellField::Role)
    }
}

impl DayCell {
    pub const EMPTY: DayCell = DayCell {
        in1: String::new(),
        out1: String::new(),
        in2: String::new(),
        out2: String::new(),
        role: String::new(),
    };

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.in1.is_empty() && self.out1.is_empty() && self.in2.is_empty() && self.out2.is_empty()
    }

    pub fn first_segment_active(&self) -> bool {
        !self.in1.is_empty() && !self.out1.is_empty()
    }

    pub fn second_segment_active(&self) -> bool {
        !self.in2.is_empty() && !self.out2.is_empty()
    }

    /// Segments actifs, dans l'ordre, sous forme (entrée, sortie).
    pub fn segments(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            (self.first_segment_active(), self.in1.as_str(), self.out1.as_str()),
            (self.second_segment_active(), self.in2.as_str(), self.out2.as_str()),
        ]
        .into_iter()
        .filter(|(active, _, _)| *active)
        .map(|(_, i, o)| (i, o))
    }

    /// Copie les quatre horaires d'un preset (le rôle est conservé).
    pub fn apply_preset(&mut self, preset: &TimePreset) {
        self.in1 = preset.in1.clone();
        self.out1 = preset.out1.clone();
        self.in2 = preset.in2.clone();
        self.out2 = preset.out2.clone();
    }

    pub fn set(&mut self, field: CellField, value: String) {
        match field {
            CellField::In1 => self.in1 = value,
            CellField::Out1 => self.out1 = value,
            CellField::In2 => self.in2 = value,
            CellField::Out2 => self.out2 = value,
            CellField::Role => self.role = value,
        }
    }
}

/// Modèle de semaine réutilisable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub grid: Grid,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Planning figé, généré à partir d'un modèle pour une semaine donnée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedShift {
    pub id: ShiftId,
    pub name: String,
    #[serde(rename = "templateId")]
    pub template_id: TemplateId,
    #[serde(rename = "templateName", default)]
    pub template_name: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub grid: Grid,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl GeneratedShift {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Pointage d'une journée.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockEntry {
    #[serde(rename = "in", default)]
    pub clock_in: String,
    #[serde(rename = "out", default)]
    pub clock_out: String,
}

impl ClockEntry {
    pub fn new<I: Into<String>, O: Into<String>>(clock_in: I, clock_out: O) -> Self {
        Self {
            clock_in: clock_in.into(),
            clock_out: clock_out.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clock_in.is_empty() && self.clock_out.is_empty()
    }
}

/// username → "YYYY-MM" → "YYYY-MM-DD" → pointage
pub type TimeEntries = BTreeMap<String, BTreeMap<String, BTreeMap<String, ClockEntry>>>;

/// clé de rôle → id de section → autorisé
pub type AccessMatrix = BTreeMap<String, BTreeMap<String, bool>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_reads_existing_document_keys() {
        let raw = r#"{
            "nome": "Giulia", "cognome": "Bianchi", "username": "giulia",
            "password": "x", "collaboratore": true, "livelloAmministrazione": 1,
            "tipoContratto": "part-time", "oreContratto": 24, "posizione": "cucina"
        }"#;
        let c: Collaborator = serde_json::from_str(raw).unwrap();
        assert_eq!(c.admin_level, AdminLevel::Manager);
        assert_eq!(c.position, Position::Kitchen);
        assert_eq!(c.contract_hours, 24.0);
        assert_eq!(c.notes, "");
        assert_eq!(c.short_name(), "Giulia B.");
    }

    #[test]
    fn blank_and_textual_numbers_are_accepted() {
        let boss: Collaborator = serde_json::from_str(
            r#"{"username": "mario", "collaboratore": false, "livelloAmministrazione": "2", "oreContratto": ""}"#,
        )
        .unwrap();
        assert_eq!(boss.admin_level, AdminLevel::Boss);
        assert_eq!(boss.contract_hours, 0.0);

        let c: Collaborator =
            serde_json::from_str(r#"{"livelloAmministrazione": null, "oreContratto": "37,5"}"#).unwrap();
        assert_eq!(c.admin_level, AdminLevel::User);
        assert_eq!(c.contract_hours, 37.5);

        let c: Collaborator = serde_json::from_str(r#"{"livelloAmministrazione": -1, "oreContratto": "n/d"}"#).unwrap();
        assert_eq!(c.admin_level, AdminLevel::User);
        assert_eq!(c.contract_hours, 0.0);
    }

    #[test]
    fn admin_level_above_boss_clamps() {
        let c: Collaborator = serde_json::from_str(r#"{"livelloAmministrazione": 7}"#).unwrap();
        assert_eq!(c.admin_level, AdminLevel::Boss);
        assert_eq!(c.admin_level.role_key(), "2");
    }

    #[test]
    fn day_keys_parse_and_order() {
        assert_eq!(DayKey::parse("Mercoledi"), Some(DayKey::Mercoledi));
        assert_eq!(DayKey::parse("sab"), Some(DayKey::Sabato));
        assert_eq!(DayKey::parse("monday"), None);
        assert!(DayKey::Lunedi < DayKey::Domenica);
        assert_eq!(DayKey::from_weekday(chrono::Weekday::Sun), DayKey::Domenica);
        assert_eq!(serde_json::to_string(&DayKey::Giovedi).unwrap(), "\"giovedi\"");
    }

    #[test]
    fn segments_skip_incomplete_pairs() {
        let cell = DayCell {
            in1: "08:00".into(),
            out1: "12:00".into(),
            in2: "18:00".into(),
            ..DayCell::default()
        };
        let segs: Vec<_> = cell.segments().collect();
        assert_eq!(segs, vec![("08:00", "12:00")]);
    }
}

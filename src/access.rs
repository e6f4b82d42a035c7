//! Contrôle d'accès par rôle, identification et documents de référence.

use crate::model::{AccessMatrix, AdminLevel, Collaborator};
use std::fmt;
use thiserror::Error;

/// Sections de l'application soumises (ou non) à la matrice d'accès.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    Collaborators,
    Templates,
    ShiftGenerator,
    ShiftViewer,
    TimeClock,
    Attendance,
    Profile,
    Permissions,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Home,
        Section::Collaborators,
        Section::Templates,
        Section::ShiftGenerator,
        Section::ShiftViewer,
        Section::TimeClock,
        Section::Attendance,
        Section::Profile,
        Section::Permissions,
    ];

    /// Clé dans la matrice d'accès.
    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Collaborators => "collaboratori",
            Section::Templates => "modelli",
            Section::ShiftGenerator => "generatore",
            Section::ShiftViewer => "turni",
            Section::TimeClock => "timbrature",
            Section::Attendance => "presenze",
            Section::Profile => "profilo",
            Section::Permissions => "permessi",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Collaborators => "Collaboratori",
            Section::Templates => "Modelli",
            Section::ShiftGenerator => "Generatore turni",
            Section::ShiftViewer => "Turni creati",
            Section::TimeClock => "Timbrature",
            Section::Attendance => "Presenze",
            Section::Profile => "Profilo",
            Section::Permissions => "Permessi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|sec| sec.id() == s || sec.label().to_lowercase() == s)
    }

    /// Toujours accessible, quelle que soit la matrice.
    pub fn always_allow(self) -> bool {
        matches!(self, Section::Home | Section::Profile)
    }

    /// Réservée au niveau Boss.
    pub fn boss_only(self) -> bool {
        matches!(self, Section::Permissions)
    }

    /// Ligne affichée dans l'éditeur de permissions.
    pub fn show_in_permissions(self) -> bool {
        !self.boss_only()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Règles, dans l'ordre : toujours autorisée, réservée au boss, puis matrice
/// (une entrée absente vaut autorisé).
pub fn can_access(level: AdminLevel, section: Section, matrix: &AccessMatrix) -> bool {
    if section.always_allow() {
        return true;
    }
    if section.boss_only() {
        return level == AdminLevel::Boss;
    }
    matrix
        .get(&level.role_key())
        .and_then(|row| row.get(section.id()))
        .copied()
        .unwrap_or(true)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("only a boss can change permissions")]
    NotAllowed,
    #[error("section `{0}` is always accessible")]
    Locked(Section),
}

/// Modifie une case de la matrice ; seul un boss peut le faire.
pub fn set_access(
    matrix: &mut AccessMatrix,
    editor: AdminLevel,
    section: Section,
    role: AdminLevel,
    allowed: bool,
) -> Result<(), AccessError> {
    if editor != AdminLevel::Boss {
        return Err(AccessError::NotAllowed);
    }
    if section.always_allow() || !section.show_in_permissions() {
        return Err(AccessError::Locked(section));
    }
    matrix
        .entry(role.role_key())
        .or_default()
        .insert(section.id().to_string(), allowed);
    Ok(())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Credenziali non valide")]
    InvalidCredentials,
}

/// Username et mot de passe doivent correspondre exactement.
pub fn authenticate<'a>(
    users: &'a [Collaborator],
    username: &str,
    password: &str,
) -> Result<&'a Collaborator, AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or(AuthError::InvalidCredentials)
}

/// Document de référence consultable depuis l'accueil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    pub label: &'static str,
    pub file: &'static str,
}

pub const DOCUMENTS: [Document; 5] = [
    Document { label: "Mansionario Sala", file: "Mansionario Sala.pdf" },
    Document { label: "Mansionario Cucina", file: "Mansionario Cucina.pdf" },
    Document { label: "Mansionario Banco", file: "Mansionario Banco.pdf" },
    Document { label: "Schede tecniche Food", file: "Schede tecniche Food.pdf" },
    Document { label: "Schede tecniche Drink", file: "Schede tecniche Drink.pdf" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_entries_are_allowed() {
        let matrix = AccessMatrix::new();
        for level in AdminLevel::ALL {
            assert!(can_access(level, Section::Attendance, &matrix));
        }
    }

    #[test]
    fn precedence_rules() {
        let mut matrix = AccessMatrix::new();
        set_access(&mut matrix, AdminLevel::Boss, Section::Templates, AdminLevel::User, false).unwrap();
        assert!(!can_access(AdminLevel::User, Section::Templates, &matrix));
        assert!(can_access(AdminLevel::Manager, Section::Templates, &matrix));
        // toujours autorisée même si la matrice dit non
        matrix.entry("0".into()).or_default().insert("home".into(), false);
        assert!(can_access(AdminLevel::User, Section::Home, &matrix));
        assert!(!can_access(AdminLevel::Manager, Section::Permissions, &matrix));
        assert!(can_access(AdminLevel::Boss, Section::Permissions, &matrix));
    }

    #[test]
    fn only_boss_edits_unlocked_sections() {
        let mut matrix = AccessMatrix::new();
        assert_eq!(
            set_access(&mut matrix, AdminLevel::Manager, Section::Templates, AdminLevel::User, false),
            Err(AccessError::NotAllowed)
        );
        assert_eq!(
            set_access(&mut matrix, AdminLevel::Boss, Section::Profile, AdminLevel::User, false),
            Err(AccessError::Locked(Section::Profile))
        );
        assert!(matrix.is_empty());
    }

    #[test]
    fn credentials_must_match_exactly() {
        let mut anna = Collaborator::new("Anna", "Neri", "anna");
        anna.password = "secret".into();
        let users = vec![anna];
        assert!(authenticate(&users, "anna", "secret").is_ok());
        let err = authenticate(&users, "anna", "Secret").unwrap_err();
        assert_eq!(err.to_string(), "Credenziali non valide");
        assert_eq!(authenticate(&users, "ghost", "secret"), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn sections_parse_by_id_or_label() {
        assert_eq!(Section::parse("presenze"), Some(Section::Attendance));
        assert_eq!(Section::parse("Turni creati"), Some(Section::ShiftViewer));
        assert_eq!(Section::parse("nope"), None);
    }
}

// src/noyau/erreurs.rs
//
// Erreurs de compilation (lexicales + syntaxiques).
// L’évaluation, elle, n’échoue jamais : les cas limites sont des Valeur (Indefini/Infini).
//
// `position` = décalage en octets (base 1) de la fin du jeton fautif, jamais 0.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreErreur {
    Lexicale,
    Syntaxe,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCompilation {
    #[error("caractère inattendu: '{caractere}' (position {position})")]
    CaractereInattendu { caractere: char, position: usize },

    #[error("identifiant inconnu: {nom} (position {position})")]
    IdentifiantInconnu { nom: String, position: usize },

    #[error("nombre invalide (position {position})")]
    LitteralInvalide { position: usize },

    #[error("nombre non représentable en 64 bits (position {position})")]
    LitteralTropGrand { position: usize },

    #[error("{attendu} (position {position})")]
    Syntaxe {
        attendu: &'static str,
        position: usize,
    },

    #[error("{nom} attend {attendu} argument(s) (position {position})")]
    NombreArguments {
        nom: String,
        attendu: usize,
        position: usize,
    },

    #[error("imbrication trop profonde: max {max} (position {position})")]
    ProfondeurMax { max: usize, position: usize },

    #[error("arité {arite} hors limite pour {nom} (max 7)")]
    AriteHorsLimite { nom: String, arite: usize },
}

impl ErreurCompilation {
    /// Position (base 1) du premier jeton non consommé.
    pub fn position(&self) -> usize {
        use ErreurCompilation::*;
        let p = match self {
            CaractereInattendu { position, .. }
            | IdentifiantInconnu { position, .. }
            | LitteralInvalide { position }
            | LitteralTropGrand { position }
            | Syntaxe { position, .. }
            | NombreArguments { position, .. }
            | ProfondeurMax { position, .. } => *position,
            // liste de l’appelant (arité > ARITE_MAX) : pas de position dans le texte
            AriteHorsLimite { .. } => 1,
        };
        p.max(1)
    }

    pub fn genre(&self) -> GenreErreur {
        use ErreurCompilation::*;
        match self {
            CaractereInattendu { .. }
            | IdentifiantInconnu { .. }
            | LitteralInvalide { .. }
            | LitteralTropGrand { .. } => GenreErreur::Lexicale,
            Syntaxe { .. } | NombreArguments { .. } | ProfondeurMax { .. } | AriteHorsLimite { .. } => {
                GenreErreur::Syntaxe
            }
        }
    }
}

//! src/noyau/options.rs
//!
//! Options de compilation (sans état caché).
//!
//! Reprend les deux options de compilation historiques :
//! - puissance à droite : a^b^c = a^(b^c) et -a^b = -(a^b)
//! - log naturel        : `log` = ln au lieu de log10
//!
//! Garde-fous : l’analyse, le pliage et l’évaluation sont récursifs.
//! - profondeur : imbrication (parenthèses, appels) pendant l’analyse
//! - hauteur    : hauteur de l’arbre construit (évaluation, pliage, libération)
//!
//! Les bornes dures tiennent sur une pile de 2 Mo (thread de test, build debug).
//!
//! Construction par méthodes : `Options::default().avec_log_naturel(true).sans_pliage()`.

/// Imbrication maximale par défaut.
pub const PROFONDEUR_MAX_DEFAUT: usize = 128;

/// Borne dure de l’imbrication.
pub const PROFONDEUR_MAX_LIMITE: usize = 200;

/// Hauteur d’arbre maximale par défaut.
pub const HAUTEUR_MAX_DEFAUT: usize = 512;

/// Borne dure de la hauteur.
pub const HAUTEUR_MAX_LIMITE: usize = 1024;

#[derive(Clone, Debug)]
pub struct Options {
    puissance_a_droite: bool,
    log_naturel: bool,
    optimiser: bool,
    profondeur_max: usize,
    hauteur_max: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            puissance_a_droite: false,
            log_naturel: false,
            optimiser: true,
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
            hauteur_max: HAUTEUR_MAX_DEFAUT,
        }
    }
}

impl Options {
    /// Exponentiation de droite à gauche (défaut : gauche à droite).
    pub fn puissance_a_droite(&self) -> bool {
        self.puissance_a_droite
    }

    /// `log` = logarithme naturel (défaut : base 10).
    pub fn log_naturel(&self) -> bool {
        self.log_naturel
    }

    /// Pliage des constantes avant évaluation.
    pub fn optimiser(&self) -> bool {
        self.optimiser
    }

    pub fn profondeur_max(&self) -> usize {
        self.profondeur_max
    }

    pub fn hauteur_max(&self) -> usize {
        self.hauteur_max
    }

    /// Borne l’imbrication à [1, PROFONDEUR_MAX_LIMITE].
    pub fn set_profondeur_max(&mut self, profondeur: usize) {
        self.profondeur_max = profondeur.clamp(1, PROFONDEUR_MAX_LIMITE);
    }

    /// Borne la hauteur à [1, HAUTEUR_MAX_LIMITE].
    pub fn set_hauteur_max(&mut self, hauteur: usize) {
        self.hauteur_max = hauteur.clamp(1, HAUTEUR_MAX_LIMITE);
    }

    pub fn avec_puissance_a_droite(mut self, oui: bool) -> Self {
        self.puissance_a_droite = oui;
        self
    }

    pub fn avec_log_naturel(mut self, oui: bool) -> Self {
        self.log_naturel = oui;
        self
    }

    pub fn avec_pliage(mut self, oui: bool) -> Self {
        self.optimiser = oui;
        self
    }

    pub fn sans_pliage(self) -> Self {
        self.avec_pliage(false)
    }

    pub fn avec_profondeur_max(mut self, profondeur: usize) -> Self {
        self.set_profondeur_max(profondeur);
        self
    }

    pub fn avec_hauteur_max(mut self, hauteur: usize) -> Self {
        self.set_hauteur_max(hauteur);
        self
    }
}

//! Noyau exact Q-pur
//!
//! Organisation interne :
//! - rationnel.rs : rationnels 64 bits réduits + Valeur (Nombre / Indefini / Infini)
//! - fonctions.rs : opérations natives (opérateurs, constantes SI, fonctions exactes)
//! - symboles.rs  : natifs triés + liaisons de l’appelant
//! - jetons.rs    : lexeur (identifiants résolus à la volée)
//! - arbre.rs     : AST à arité variable (0..=7)
//! - analyse.rs   : descente récursive
//! - eval.rs      : évaluation postfixe
//! - optim.rs     : pliage des constantes
//! - format.rs    : affichage (démarche)
//! - compile.rs   : pipeline public

pub mod analyse;
pub mod arbre;
pub mod compile;
pub mod erreurs;
pub mod eval;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod optim;
pub mod options;
pub mod rationnel;
pub mod symboles;

#[cfg(test)]
mod tests_scientifiques;


#[cfg(test)]
mod tests_proprietes;

// API publique
pub use arbre::Variable;
pub use compile::{
    compile, compile_avec, eval_expression, eval_expression_avec, evaluate, interpret,
    Demarche, Expression,
};
pub use erreurs::{ErreurCompilation, GenreErreur};
pub use options::Options;
pub use rationnel::Valeur;
pub use symboles::Liaison;

// src/lib.rs
//
// Analyseur arithmétique Q-pur : racine de la bibliothèque
// --------------------------------------------------------
// Compile une expression infixe en arbre, plie les constantes,
// puis évalue en rationnels exacts (jamais de flottants).
//
// La couche d’intégration (hôte, formatage "n/d", erreurs hôte) vit ailleurs :
// ici on expose seulement compile / evaluate / interpret + la démarche.

pub mod noyau;

// Ré-export pratique : `use analyseur_qpur::{compile, interpret, Valeur};`
pub use noyau::{
    compile, compile_avec, eval_expression, eval_expression_avec, evaluate, interpret, Demarche,
    ErreurCompilation, Expression, GenreErreur, Liaison, Options, Valeur, Variable,
};

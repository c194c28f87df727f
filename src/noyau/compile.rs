//! Noyau : pipeline public
//!
//! texte -> (jetons à la demande) -> arbre -> pliage des constantes -> évaluation
//!
//! `compile` rend une Expression réutilisable : les variables de l’appelant sont des
//! cellules partagées, relues à chaque `evaluate`. `eval_expression` fait tout d’un
//! coup et rend aussi la démarche (jetons, arbre avant/après pliage, note).

use super::analyse::analyser;
use super::arbre::Noeud;
use super::erreurs::ErreurCompilation;
use super::eval;
use super::format::{format_arbre, format_tokens};
use super::jetons::tokenize;
use super::optim::optimize;
use super::options::Options;
use super::rationnel::Valeur;
use super::symboles::Liaison;

/// Arbre compilé (prêt à être évalué autant de fois que voulu).
#[derive(Clone, Debug)]
pub struct Expression {
    racine: Noeud,
}

impl Expression {
    pub fn racine(&self) -> &Noeud {
        &self.racine
    }

    pub fn evaluate(&self) -> Valeur {
        eval::evaluate(&self.racine)
    }
}

#[derive(Default, Clone, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub avant: String,
    pub apres: String,
    pub note: String,
}

pub fn compile(expression: &str, vars: &[Liaison]) -> Result<Expression, ErreurCompilation> {
    compile_avec(expression, vars, &Options::default())
}

pub fn compile_avec(
    expression: &str,
    vars: &[Liaison],
    options: &Options,
) -> Result<Expression, ErreurCompilation> {
    let mut racine = analyser(expression, vars, options)?;
    if options.optimiser() {
        optimize(&mut racine);
    }
    Ok(Expression { racine })
}

pub fn evaluate(expression: &Expression) -> Valeur {
    expression.evaluate()
}

/// Compile + évalue sans variables ; échec de compilation => Indefini.
pub fn interpret(expression: &str) -> Valeur {
    match compile(expression, &[]) {
        Ok(e) => e.evaluate(),
        Err(_) => Valeur::Indefini,
    }
}

/// API “démarche” : valeur + trace lisible, options par défaut.
pub fn eval_expression(
    expression: &str,
    vars: &[Liaison],
) -> Result<(Valeur, Demarche), ErreurCompilation> {
    eval_expression_avec(expression, vars, &Options::default())
}

pub fn eval_expression_avec(
    expression: &str,
    vars: &[Liaison],
    options: &Options,
) -> Result<(Valeur, Demarche), ErreurCompilation> {
    // 1) Arbre (d’abord : c’est lui qui donne l’erreur la plus précise)
    let mut racine = analyser(expression, vars, options)?;

    // 2) Jetons (ne peut plus échouer : le texte vient d’être lu en entier)
    let jetons = tokenize(expression, vars, options)?;

    // 3) Pliage
    let avant = format_arbre(&racine);
    let taille = racine.nb_noeuds();
    let plis = if options.optimiser() {
        optimize(&mut racine)
    } else {
        0
    };
    let apres = format_arbre(&racine);

    // 4) Évaluation
    let valeur = eval::evaluate(&racine);

    let note = format!(
        "{taille} nœud(s), hauteur {} ; {plis} pliage(s) -> {} nœud(s)",
        racine.hauteur(),
        racine.nb_noeuds(),
    );

    Ok((
        valeur,
        Demarche {
            jetons: format_tokens(&jetons),
            avant,
            apres,
            note,
        },
    ))
}

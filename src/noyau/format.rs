// src/noyau/format.rs
//
// Affichage lisible (démarche) : valeurs, jetons, arbre infixe.
// Parenthèses seulement là où la priorité l’exige ; ^ toujours explicite
// (la lecture ne dépend donc pas de Options::puissance_a_droite).

use std::fmt;

use super::arbre::{Fonction, Noeud};
use super::fonctions::Operation;
use super::jetons::Jeton;
use super::rationnel::Valeur;

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valeur::Nombre(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Valeur::Nombre(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Valeur::Indefini => f.write_str("indéfini"),
            Valeur::Infini => f.write_str("infini"),
        }
    }
}

/* ------------------------ Jetons ------------------------ */

/// Liste de jetons en texte (démarche).
pub fn format_tokens(jetons: &[Jeton]) -> String {
    let mut out = Vec::with_capacity(jetons.len());
    for j in jetons {
        let s = match j {
            Jeton::Nombre(v) => v.to_string(),
            Jeton::Variable { nom, .. } => nom.to_string(),
            Jeton::Fonction(f) => f.nom().to_string(),
            Jeton::Fermeture(f) => f.nom.to_string(),
            Jeton::Infixe(op) => op.nom().to_string(),
            Jeton::Ouvrante => "(".to_string(),
            Jeton::Fermante => ")".to_string(),
            Jeton::Separateur => ",".to_string(),
            Jeton::Fin => continue,
        };
        out.push(s);
    }
    out.join(" ")
}

/* ------------------------ Arbre ------------------------ */

const RANG_VIRGULE: u8 = 0;
const RANG_ADDITIF: u8 = 1;
const RANG_MULTIPLICATIF: u8 = 2;
const RANG_PUISSANCE: u8 = 3;
const RANG_NEGATION: u8 = 4;
const RANG_ATOME: u8 = 5;

fn rang_operation(op: Operation) -> Option<u8> {
    use Operation::*;
    match op {
        Virgule => Some(RANG_VIRGULE),
        Addition | Soustraction => Some(RANG_ADDITIF),
        Multiplication | Division | Modulo | PuissanceDix => Some(RANG_MULTIPLICATIF),
        Puissance => Some(RANG_PUISSANCE),
        Negation => Some(RANG_NEGATION),
        _ => None,
    }
}

/// Opération native affichée comme opérateur (arité respectée).
fn comme_operateur(n: &Noeud) -> Option<(Operation, u8)> {
    match n {
        Noeud::Fonction {
            fonction: Fonction::Interne(op),
            enfants,
        } if enfants.len() == op.arite() => rang_operation(*op).map(|r| (*op, r)),
        _ => None,
    }
}

fn rang(n: &Noeud) -> u8 {
    match n {
        // -3 se lit comme une négation, 3/4 comme une division
        Noeud::Constante(Valeur::Nombre(r)) if *r.numer() < 0 => RANG_ADDITIF,
        Noeud::Constante(Valeur::Nombre(r)) if !r.is_integer() => RANG_MULTIPLICATIF,
        _ => comme_operateur(n).map_or(RANG_ATOME, |(_, r)| r),
    }
}

fn ecrire(n: &Noeud, out: &mut String) {
    if let Some((op, r)) = comme_operateur(n) {
        let enfants = n.enfants();
        match op {
            Operation::Negation => {
                out.push('-');
                ecrire_entoure(&enfants[0], rang(&enfants[0]) < RANG_NEGATION, out);
            }
            Operation::Virgule => {
                ecrire(&enfants[0], out);
                out.push_str(", ");
                ecrire(&enfants[1], out);
            }
            Operation::Puissance => {
                ecrire_entoure(&enfants[0], rang(&enfants[0]) <= RANG_NEGATION, out);
                out.push('^');
                ecrire_entoure(&enfants[1], rang(&enfants[1]) <= RANG_NEGATION, out);
            }
            _ => {
                // associatif à gauche : a - (b - c)
                ecrire_entoure(&enfants[0], rang(&enfants[0]) < r, out);
                out.push(' ');
                out.push_str(op.nom());
                out.push(' ');
                ecrire_entoure(&enfants[1], rang(&enfants[1]) <= r, out);
            }
        }
        return;
    }

    match n {
        Noeud::Constante(v) => out.push_str(&v.to_string()),
        Noeud::Variable { nom, .. } => out.push_str(nom),
        Noeud::Fonction { fonction, enfants } => ecrire_appel(fonction.nom(), enfants, out),
        Noeud::Fermeture { fermeture, enfants } => ecrire_appel(&fermeture.nom, enfants, out),
    }
}

fn ecrire_entoure(n: &Noeud, parentheses: bool, out: &mut String) {
    if parentheses {
        out.push('(');
        ecrire(n, out);
        out.push(')');
    } else {
        ecrire(n, out);
    }
}

fn ecrire_appel(nom: &str, enfants: &[Noeud], out: &mut String) {
    out.push_str(nom);
    if enfants.is_empty() {
        return;
    }
    out.push('(');
    for (i, e) in enfants.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        ecrire_entoure(e, rang(e) == RANG_VIRGULE, out);
    }
    out.push(')');
}

/// Arbre en notation infixe (démarche avant/après pliage).
pub fn format_arbre(n: &Noeud) -> String {
    let mut out = String::new();
    ecrire(n, &mut out);
    out
}

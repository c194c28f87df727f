// src/noyau/jetons.rs
//
// Lexeur : curseur sur le texte -> jetons typés, à la demande de l’analyseur.
// Les identifiants sont résolus ici (appelant d’abord, natifs ensuite).
//
// Supporte:
// - nombres décimaux exacts (ex: 3.25 -> 13/4), sans flottant
// - opérateurs + - * / ^ % et e/E (a e b = a × 10^b)
// - parenthèses ( ) et séparateur ,
// - identifiants [a-zA-Z][a-zA-Z0-9_]* (sauf e/E en tête)

use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;

use super::arbre::{Fermeture, Fonction, Variable};
use super::erreurs::ErreurCompilation;
use super::fonctions::Operation;
use super::options::Options;
use super::rationnel::{depuis_big, Valeur};
use super::symboles::{lookup, Cible, Liaison};

#[derive(Clone, Debug)]
pub enum Jeton {
    Nombre(Valeur),
    Variable { nom: Rc<str>, variable: Variable },
    Fonction(Fonction),
    Fermeture(Fermeture),
    Infixe(Operation),
    Ouvrante,
    Fermante,
    Separateur,
    Fin,
}

pub struct Lexeur<'a> {
    source: &'a str,
    curseur: usize,
    courant: Jeton,
    debut: usize,
    fin: usize,
    vars: &'a [Liaison],
    options: &'a Options,
}

impl<'a> Lexeur<'a> {
    /// Lexeur posé avant le premier jeton : appeler `suivant()` d’abord.
    pub fn new(source: &'a str, vars: &'a [Liaison], options: &'a Options) -> Self {
        Self {
            source,
            curseur: 0,
            courant: Jeton::Fin,
            debut: 0,
            fin: 0,
            vars,
            options,
        }
    }

    pub fn courant(&self) -> &Jeton {
        &self.courant
    }

    /// Début (octets, base 0) du jeton courant.
    pub fn debut_jeton(&self) -> usize {
        self.debut
    }

    /// Fin du jeton courant = position (base 1) de son dernier octet, jamais 0.
    pub fn fin_jeton(&self) -> usize {
        self.fin.max(1)
    }

    /// Avance d’un jeton.
    pub fn suivant(&mut self) -> Result<(), ErreurCompilation> {
        let source = self.source;
        let octets = source.as_bytes();

        while self.curseur < octets.len() && octets[self.curseur].is_ascii_whitespace() {
            self.curseur += 1;
        }

        self.debut = self.curseur;
        if self.curseur >= octets.len() {
            self.fin = octets.len();
            self.courant = Jeton::Fin;
            return Ok(());
        }

        let c = octets[self.curseur];

        // Nombre
        if c.is_ascii_digit() || c == b'.' {
            let (v, fin) = convert_str(source, self.curseur)?;
            self.curseur = fin;
            self.fin = fin;
            self.courant = Jeton::Nombre(v);
            return Ok(());
        }

        // Identifiant (e/E restent des opérateurs)
        if c.is_ascii_alphabetic() && c != b'e' && c != b'E' {
            let mut i = self.curseur + 1;
            while i < octets.len() && (octets[i].is_ascii_alphanumeric() || octets[i] == b'_') {
                i += 1;
            }
            let nom = &source[self.curseur..i];
            self.curseur = i;
            self.fin = i;
            self.courant = self.resoudre(nom)?;
            return Ok(());
        }

        let jeton = match c {
            b'+' => Jeton::Infixe(Operation::Addition),
            b'-' => Jeton::Infixe(Operation::Soustraction),
            b'*' => Jeton::Infixe(Operation::Multiplication),
            b'/' => Jeton::Infixe(Operation::Division),
            b'^' => Jeton::Infixe(Operation::Puissance),
            b'%' => Jeton::Infixe(Operation::Modulo),
            b'e' | b'E' => Jeton::Infixe(Operation::PuissanceDix),
            b'(' => Jeton::Ouvrante,
            b')' => Jeton::Fermante,
            b',' => Jeton::Separateur,
            _ => {
                let caractere = source[self.curseur..].chars().next().unwrap_or('\u{fffd}');
                return Err(ErreurCompilation::CaractereInattendu {
                    caractere,
                    position: self.curseur + caractere.len_utf8(),
                });
            }
        };

        self.curseur += 1;
        self.fin = self.curseur;
        self.courant = jeton;
        Ok(())
    }

    fn resoudre(&self, nom: &str) -> Result<Jeton, ErreurCompilation> {
        let cible = lookup(self.vars, nom).ok_or_else(|| ErreurCompilation::IdentifiantInconnu {
            nom: nom.to_string(),
            position: self.fin,
        })?;

        Ok(match cible {
            Cible::Variable(variable) => Jeton::Variable {
                nom: Rc::from(nom),
                variable,
            },
            Cible::Fonction(Fonction::Interne(Operation::Log)) if self.options.log_naturel() => {
                Jeton::Fonction(Fonction::Interne(Operation::Ln))
            }
            Cible::Fonction(f) => Jeton::Fonction(f),
            Cible::Fermeture(f) => Jeton::Fermeture(f),
        })
    }
}

/// Littéral décimal exact à partir de `debut`.
/// Chiffres + au plus un point (un second point arrête la lecture sans être consommé).
/// Renvoie la valeur réduite et la fin (octets, exclusive).
pub fn convert_str(source: &str, debut: usize) -> Result<(Valeur, usize), ErreurCompilation> {
    let octets = source.as_bytes();
    let mut i = debut;
    let mut chiffres = String::new();
    let mut decimales: u32 = 0;
    let mut point = false;

    while i < octets.len() {
        let c = octets[i];
        if c.is_ascii_digit() {
            chiffres.push(char::from(c));
            if point {
                decimales += 1;
            }
        } else if c == b'.' && !point {
            point = true;
        } else {
            break;
        }
        i += 1;
    }

    let invalide = ErreurCompilation::LitteralInvalide {
        position: i.max(1),
    };
    if chiffres.is_empty() {
        return Err(invalide);
    }

    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or(invalide)?;
    let d = BigInt::from(10).pow(decimales);

    match depuis_big(&BigRational::new(n, d)) {
        v @ Valeur::Nombre(_) => Ok((v, i)),
        _ => Err(ErreurCompilation::LitteralTropGrand {
            position: i.max(1),
        }),
    }
}

/// Tous les jetons jusqu’à la fin (exclue). Sert à la démarche.
pub fn tokenize(
    source: &str,
    vars: &[Liaison],
    options: &Options,
) -> Result<Vec<Jeton>, ErreurCompilation> {
    let mut lex = Lexeur::new(source, vars, options);
    let mut out = Vec::new();
    loop {
        lex.suivant()?;
        match lex.courant() {
            Jeton::Fin => return Ok(out),
            j => out.push(j.clone()),
        }
    }
}

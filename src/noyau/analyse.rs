// src/noyau/analyse.rs
//
// Descente récursive (jetons -> arbre)
// -----------------------------------
// list   := expr (',' expr)*
// expr   := term (('+'|'-') term)*
// term   := factor (('*'|'/'|'%'|'e'|'E') factor)*
// factor := power ('^' power)*
// power  := ('+'|'-')* base
// base   := NOMBRE | VARIABLE | FONCTION_0 ['(' ')'] | FONCTION_1 power
//         | FONCTION_n '(' expr (',' expr)* ')' | '(' list ')'
//
// Les trois premiers niveaux (list, expr, term) sont lus par une seule boucle à rangs
// (`binaire`) et les signes sont lus sur place dans `facteur` : une parenthèse ne coûte
// que trois appels imbriqués (base -> binaire -> facteur -> base).
//
// Première erreur => arrêt (Result). Position = fin du jeton examiné.
// Imbrication bornée par Options::profondeur_max, hauteur d’arbre par Options::hauteur_max.

use super::arbre::{Fermeture, Fonction, Noeud};
use super::erreurs::ErreurCompilation;
use super::fonctions::Operation;
use super::jetons::{Jeton, Lexeur};
use super::options::Options;
use super::symboles::{verifier_liaisons, Liaison};

const RANG_LISTE: u8 = 0;
const RANG_ADDITIF: u8 = 1;
const RANG_MULTIPLICATIF: u8 = 2;

/// Sous-arbre + sa hauteur (évite de la recalculer à chaque assemblage).
struct Sous {
    noeud: Noeud,
    hauteur: usize,
}

impl Sous {
    fn feuille(noeud: Noeud) -> Self {
        Sous { noeud, hauteur: 1 }
    }
}

enum Appelable {
    Fonction(Fonction),
    Fermeture(Fermeture),
}

impl Appelable {
    fn arite(&self) -> usize {
        match self {
            Appelable::Fonction(f) => f.arite(),
            Appelable::Fermeture(f) => f.arite,
        }
    }

    fn nom(&self) -> &str {
        match self {
            Appelable::Fonction(f) => f.nom(),
            Appelable::Fermeture(f) => &*f.nom,
        }
    }

    fn noeud(self, enfants: Vec<Noeud>) -> Noeud {
        match self {
            Appelable::Fonction(fonction) => Noeud::Fonction { fonction, enfants },
            Appelable::Fermeture(fermeture) => Noeud::Fermeture { fermeture, enfants },
        }
    }
}

struct Analyseur<'a> {
    lex: Lexeur<'a>,
    options: &'a Options,
    profondeur: usize,
}

/// Texte -> arbre (non optimisé).
pub fn analyser(
    source: &str,
    vars: &[Liaison],
    options: &Options,
) -> Result<Noeud, ErreurCompilation> {
    verifier_liaisons(vars)?;

    let mut a = Analyseur {
        lex: Lexeur::new(source, vars, options),
        options,
        profondeur: 0,
    };
    a.lex.suivant()?;

    let racine = a.binaire(RANG_LISTE)?;
    if !matches!(a.lex.courant(), Jeton::Fin) {
        return Err(a.syntaxe("fin d’expression attendue"));
    }
    Ok(racine.noeud)
}

impl<'a> Analyseur<'a> {
    /* ------------------------ Outils ------------------------ */

    fn syntaxe(&self, attendu: &'static str) -> ErreurCompilation {
        ErreurCompilation::Syntaxe {
            attendu,
            position: self.lex.fin_jeton(),
        }
    }

    fn trop_profond(&self, max: usize) -> ErreurCompilation {
        ErreurCompilation::ProfondeurMax {
            max,
            position: self.lex.fin_jeton(),
        }
    }

    fn est_puissance(&self) -> bool {
        matches!(self.lex.courant(), Jeton::Infixe(Operation::Puissance))
    }

    /// Opérateur binaire courant s’il est de rang >= `min`.
    fn operateur(&self, min: u8) -> Option<(Operation, u8)> {
        use Operation::*;
        let (op, rang) = match self.lex.courant() {
            Jeton::Separateur => (Virgule, RANG_LISTE),
            Jeton::Infixe(op @ (Addition | Soustraction)) => (*op, RANG_ADDITIF),
            Jeton::Infixe(op @ (Multiplication | Division | Modulo | PuissanceDix)) => {
                (*op, RANG_MULTIPLICATIF)
            }
            _ => return None,
        };
        (rang >= min).then_some((op, rang))
    }

    /// Assemble un nœud en contrôlant la hauteur.
    fn assembler(&self, appelable: Appelable, enfants: Vec<Sous>) -> Result<Sous, ErreurCompilation> {
        let hauteur = 1 + enfants.iter().map(|s| s.hauteur).max().unwrap_or(0);
        if hauteur > self.options.hauteur_max() {
            return Err(self.trop_profond(self.options.hauteur_max()));
        }
        let enfants = enfants.into_iter().map(|s| s.noeud).collect();
        Ok(Sous {
            noeud: appelable.noeud(enfants),
            hauteur,
        })
    }

    fn operation(&self, op: Operation, enfants: Vec<Sous>) -> Result<Sous, ErreurCompilation> {
        self.assembler(Appelable::Fonction(Fonction::Interne(op)), enfants)
    }

    fn negation(&self, negatif: bool, s: Sous) -> Result<Sous, ErreurCompilation> {
        if negatif {
            self.operation(Operation::Negation, vec![s])
        } else {
            Ok(s)
        }
    }

    /// Signes de tête : nombre de '-' impair => négatif.
    fn signes(&mut self) -> Result<bool, ErreurCompilation> {
        let mut negatif = false;
        while let Jeton::Infixe(op @ (Operation::Addition | Operation::Soustraction)) =
            self.lex.courant()
        {
            if *op == Operation::Soustraction {
                negatif = !negatif;
            }
            self.lex.suivant()?;
        }
        Ok(negatif)
    }

    /* ------------------------ Grammaire ------------------------ */

    /// list (min = RANG_LISTE), expr (RANG_ADDITIF), term (RANG_MULTIPLICATIF).
    /// Gauche à droite : l’opérande droite ne prend que les rangs strictement supérieurs.
    fn binaire(&mut self, min: u8) -> Result<Sous, ErreurCompilation> {
        let mut g = self.facteur()?;
        while let Some((op, rang)) = self.operateur(min) {
            self.lex.suivant()?;
            let d = if rang == RANG_MULTIPLICATIF {
                self.facteur()?
            } else {
                self.binaire(rang + 1)?
            };
            g = self.operation(op, vec![g, d])?;
        }
        Ok(g)
    }

    fn facteur(&mut self) -> Result<Sous, ErreurCompilation> {
        let negatif = self.signes()?;
        let premier = self.base()?;

        if !self.options.puissance_a_droite() {
            // a^b^c = (a^b)^c ; -a^b = (-a)^b
            let mut g = self.negation(negatif, premier)?;
            while self.est_puissance() {
                self.lex.suivant()?;
                let d = self.power()?;
                g = self.operation(Operation::Puissance, vec![g, d])?;
            }
            return Ok(g);
        }

        // a^b^c = a^(b^c) ; le signe de tête s’applique au tout : -a^b = -(a^b)
        let mut acc = premier;
        let mut gauches = Vec::new();
        while self.est_puissance() {
            self.lex.suivant()?;
            gauches.push(acc);
            acc = self.power()?;
        }
        while let Some(g) = gauches.pop() {
            acc = self.operation(Operation::Puissance, vec![g, acc])?;
        }
        self.negation(negatif, acc)
    }

    fn power(&mut self) -> Result<Sous, ErreurCompilation> {
        let negatif = self.signes()?;
        let b = self.base()?;
        self.negation(negatif, b)
    }

    fn base(&mut self) -> Result<Sous, ErreurCompilation> {
        let max = self.options.profondeur_max();
        if self.profondeur >= max {
            return Err(self.trop_profond(max));
        }
        // une erreur arrête toute l’analyse : la profondeur n’est rétablie qu’en cas de succès
        self.profondeur += 1;

        let s = match self.lex.courant() {
            Jeton::Nombre(v) => {
                let feuille = Noeud::Constante(*v);
                self.lex.suivant()?;
                Sous::feuille(feuille)
            }
            Jeton::Variable { nom, variable } => {
                let feuille = Noeud::Variable {
                    nom: nom.clone(),
                    variable: variable.clone(),
                };
                self.lex.suivant()?;
                Sous::feuille(feuille)
            }
            Jeton::Fonction(f) => {
                let appelable = Appelable::Fonction(f.clone());
                self.appel(appelable)?
            }
            Jeton::Fermeture(f) => {
                let appelable = Appelable::Fermeture(f.clone());
                self.appel(appelable)?
            }
            Jeton::Ouvrante => {
                self.lex.suivant()?;
                let s = self.binaire(RANG_LISTE)?;
                if !matches!(self.lex.courant(), Jeton::Fermante) {
                    return Err(self.syntaxe("')' attendue"));
                }
                self.lex.suivant()?;
                s
            }
            _ => return Err(self.syntaxe("valeur attendue")),
        };

        self.profondeur -= 1;
        Ok(s)
    }

    /// Appel de fonction ou de fermeture (jeton courant = le nom).
    fn appel(&mut self, appelable: Appelable) -> Result<Sous, ErreurCompilation> {
        let arite = appelable.arite();
        self.lex.suivant()?;

        match arite {
            0 => {
                // "k" ou "k()"
                if matches!(self.lex.courant(), Jeton::Ouvrante) {
                    self.lex.suivant()?;
                    if !matches!(self.lex.courant(), Jeton::Fermante) {
                        return Err(self.syntaxe("')' attendue"));
                    }
                    self.lex.suivant()?;
                }
                self.assembler(appelable, Vec::new())
            }
            1 => {
                let arg = self.power()?;
                self.assembler(appelable, vec![arg])
            }
            _ => {
                if !matches!(self.lex.courant(), Jeton::Ouvrante) {
                    return Err(self.syntaxe("'(' attendue"));
                }
                self.lex.suivant()?;

                let mut args = Vec::with_capacity(arite);
                loop {
                    args.push(self.binaire(RANG_ADDITIF)?);
                    if !matches!(self.lex.courant(), Jeton::Separateur) {
                        break;
                    }
                    if args.len() == arite {
                        return Err(self.mauvais_compte(&appelable));
                    }
                    self.lex.suivant()?;
                }

                if !matches!(self.lex.courant(), Jeton::Fermante) {
                    return Err(self.syntaxe("')' attendue"));
                }
                if args.len() != arite {
                    return Err(self.mauvais_compte(&appelable));
                }
                self.lex.suivant()?;
                self.assembler(appelable, args)
            }
        }
    }

    fn mauvais_compte(&self, appelable: &Appelable) -> ErreurCompilation {
        ErreurCompilation::NombreArguments {
            nom: appelable.nom().to_string(),
            attendu: appelable.arite(),
            position: self.lex.fin_jeton(),
        }
    }
}

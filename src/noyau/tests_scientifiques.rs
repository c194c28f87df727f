//! Tests scientifiques (campagne) : scénarios bout à bout + limites contrôlées.
//!
//! But : vérifier le pipeline complet (texte -> valeur exacte) sans faire chauffer la machine.
//! - budget temps global sur les stress
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - Les cas limites arithmétiques sont des VALEURS (indéfini / infini), pas des erreurs.
//! - Les erreurs de compilation portent une position base 1 (fin du jeton fautif).

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::options::{HAUTEUR_MAX_DEFAUT, HAUTEUR_MAX_LIMITE, PROFONDEUR_MAX_DEFAUT};
use super::rationnel::{add, INFINITY_PAIR, NAN_PAIR};
use super::{
    compile, compile_avec, eval_expression, eval_expression_avec, interpret, ErreurCompilation,
    GenreErreur, Liaison, Options, Valeur, Variable,
};

fn paire(expr: &str) -> (i64, i64) {
    let (v, _d) = eval_expression(expr, &[]).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
    v.to_pair()
}

fn paire_avec(expr: &str, options: &Options) -> (i64, i64) {
    compile_avec(expr, &[], options)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .evaluate()
        .to_pair()
}

fn assert_indefini(expr: &str) {
    assert_eq!(interpret(expr), Valeur::Indefini, "expr={expr:?}");
}

fn assert_infini(expr: &str) {
    assert_eq!(interpret(expr), Valeur::Infini, "expr={expr:?}");
}

fn erreur(expr: &str) -> ErreurCompilation {
    match compile(expr, &[]) {
        Ok(_) => panic!("expr={expr:?} aurait dû échouer"),
        Err(e) => e,
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Lecture + priorités ------------------------ */

#[test]
fn sci_litteraux_exacts() {
    assert_eq!(paire("3.25"), (13, 4));
    assert_eq!(paire("0.1 + 0.2"), (3, 10));
    assert_eq!(paire(".5*4"), (2, 1));
}

#[test]
fn sci_priorites() {
    assert_eq!(paire("1+2*3"), (7, 1));
    assert_eq!(paire("(1+2)*3"), (9, 1));
    assert_eq!(paire("10-4-3"), (3, 1));
    assert_eq!(paire("12/4/3"), (1, 1));
    assert_eq!(paire("2*-3"), (-6, 1));
    assert_eq!(paire("1, 2, 3"), (3, 1));
}

#[test]
fn sci_puissance_de_dix() {
    assert_eq!(paire("2e3"), (2000, 1));
    assert_eq!(paire("5E-2"), (1, 20));
    assert_eq!(paire("1.5e1"), (15, 1));
    assert_indefini("2e0.5");
}

#[test]
fn sci_puissances_gauche_et_droite() {
    let droite = Options::default().avec_puissance_a_droite(true);

    assert_eq!(paire("2^3^2"), (64, 1));
    assert_eq!(paire_avec("2^3^2", &droite), (512, 1));

    assert_eq!(paire("-2^2"), (4, 1));
    assert_eq!(paire_avec("-2^2", &droite), (-4, 1));

    assert_eq!(paire("2^-1"), (1, 2));
    assert_eq!(paire_avec("2^-1", &droite), (1, 2));
}

/* ------------------------ Fonctions natives ------------------------ */

#[test]
fn sci_factorielle() {
    assert_eq!(paire("fac(5)"), (120, 1));
    assert_eq!(paire("fac 0"), (1, 1));
    assert_eq!(paire("fac(-1)"), NAN_PAIR);
    assert_eq!(paire("fac(2.5)"), NAN_PAIR);
    assert_eq!(paire("fac(21)"), INFINITY_PAIR);
}

#[test]
fn sci_constantes_si() {
    assert_eq!(paire("3*M + 4*k"), (3_004_000, 1));
    assert_eq!(paire("Mhz"), (1_000_000, 1));
    assert_eq!(paire("2*m"), (1, 500));
    assert_eq!(paire("u*1000"), (1, 1000));
    assert_eq!(paire("da*h"), (1000, 1));
    assert_eq!(paire("P/T"), (1000, 1));
    assert_eq!(paire("k()"), (1000, 1));
}

#[test]
fn sci_fonctions_exactes() {
    assert_eq!(paire("pow(2, 10)"), (1024, 1));
    assert_eq!(paire("sqrt 16"), (4, 1));
    assert_eq!(paire("sqrt(9/4)"), (3, 2));
    assert_eq!(paire("abs(-7/3)"), (7, 3));
    assert_eq!(paire("log 1000"), (3, 1));
    assert_eq!(paire("log10(0.01)"), (-2, 1));
    assert_eq!(paire("ncr(6, 3) + npr(4, 2)"), (32, 1));
    assert_eq!(paire("cos 0 + sin 0"), (1, 1));
    assert_eq!(paire("7 % 3"), (1, 1));
    assert_indefini("sqrt 2");
    assert_indefini("sin 1");
    assert_indefini("ncr(2, 5)");
    assert_eq!(paire("npr(9223372036854775807, 0)"), (1, 1));
}

#[test]
fn sci_log_naturel() {
    let naturel = Options::default().avec_log_naturel(true);
    assert_eq!(paire_avec("log 1", &naturel), (0, 1));
    assert_eq!(
        compile_avec("log 10", &[], &naturel).unwrap().evaluate(),
        Valeur::Indefini
    );
    // log10 reste en base 10
    assert_eq!(paire_avec("log10 10", &naturel), (1, 1));
}

/* ------------------------ Cas limites = valeurs ------------------------ */

#[test]
fn sci_cas_limites() {
    assert_infini("1/0");
    assert_indefini("0/0");
    assert_indefini("7 % 0");
    assert_infini("log 0");
    assert_infini("9223372036854775807 + 1");
    assert_infini("2^64");
    // indéfini l’emporte sur infini
    assert_indefini("1/0 + 0/0");
    // la virgule ne propage pas son opérande gauche
    assert_eq!(paire("1/0, 5"), (5, 1));
}

#[test]
fn sci_sentinelles_distinctes() {
    // -1 est un vrai rationnel : même paire que NaN, mais pas Indefini
    assert_eq!(interpret("-1").to_pair(), NAN_PAIR);
    assert_ne!(interpret("-1"), Valeur::Indefini);
    assert_eq!(interpret("fac(-1)"), Valeur::Indefini);
}

/* ------------------------ Erreurs de compilation ------------------------ */

#[test]
fn sci_erreurs_positionnees() {
    let e = erreur("1+*");
    assert_eq!(e.position(), 3);
    assert_eq!(e.genre(), GenreErreur::Syntaxe);

    let e = erreur("1 $ 2");
    assert_eq!(e.position(), 3);
    assert_eq!(e.genre(), GenreErreur::Lexicale);

    assert!(matches!(erreur("2 + foo"), ErreurCompilation::IdentifiantInconnu { position: 7, .. }));
    assert!(matches!(erreur("2k"), ErreurCompilation::Syntaxe { position: 2, .. }));
    assert!(matches!(erreur("atan2(1)"), ErreurCompilation::NombreArguments { .. }));
    assert!(matches!(erreur("1 + ."), ErreurCompilation::LitteralInvalide { .. }));
    assert_eq!(erreur("").position(), 1);
}

#[test]
fn sci_bornes_par_defaut() {
    let n = PROFONDEUR_MAX_DEFAUT;
    let imbrique = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert!(matches!(
        erreur(&imbrique),
        ErreurCompilation::ProfondeurMax { max: PROFONDEUR_MAX_DEFAUT, .. }
    ));
    let imbrique = format!("{}1{}", "(".repeat(n - 1), ")".repeat(n - 1));
    assert_eq!(paire(&imbrique), (1, 1));

    // hauteur d’une chaîne plate de n termes = n
    let somme = vec!["1"; HAUTEUR_MAX_DEFAUT + 1].join("+");
    assert!(matches!(
        erreur(&somme),
        ErreurCompilation::ProfondeurMax { max: HAUTEUR_MAX_DEFAUT, .. }
    ));
    let large = Options::default().avec_hauteur_max(HAUTEUR_MAX_LIMITE);
    assert_eq!(paire_avec(&somme, &large), (HAUTEUR_MAX_DEFAUT as i64 + 1, 1));
}

#[test]
fn sci_hauteur_limite_tient_sur_la_pile() {
    // toute la chaîne récursive (pliage, affichage, évaluation, libération) à la borne dure
    let somme = vec!["1"; HAUTEUR_MAX_LIMITE].join("+");
    let large = Options::default().avec_hauteur_max(HAUTEUR_MAX_LIMITE);
    let attendu = (HAUTEUR_MAX_LIMITE as i64, 1);

    let (v, d) = eval_expression_avec(&somme, &[], &large).unwrap();
    assert_eq!(v.to_pair(), attendu);
    assert_eq!(d.apres, HAUTEUR_MAX_LIMITE.to_string());

    let (v, d) = eval_expression_avec(&somme, &[], &large.clone().sans_pliage()).unwrap();
    assert_eq!(v.to_pair(), attendu);
    assert_eq!(d.avant, d.apres);

    let trop = vec!["1"; HAUTEUR_MAX_LIMITE + 1].join("+");
    assert!(matches!(
        compile_avec(&trop, &[], &large),
        Err(ErreurCompilation::ProfondeurMax { max: HAUTEUR_MAX_LIMITE, .. })
    ));
}

/* ------------------------ Liaisons de l’appelant ------------------------ */

#[test]
fn sci_variables_reliees() {
    let x = Variable::new(3_i64);
    let y = Variable::new(Valeur::zero());
    let vars = [Liaison::variable("x", &x), Liaison::variable("y", &y)];

    let e = compile("x^2 + y/2", &vars).unwrap();
    assert_eq!(e.evaluate().to_pair(), (9, 1));

    x.set(-1_i64);
    y.set(1_i64);
    assert_eq!(e.evaluate().to_pair(), (3, 2));

    // la variable n’est pas pliée : elle reste lue à chaque évaluation
    assert!(!e.racine().est_constante());
}

#[test]
fn sci_masquage_des_natifs() {
    let k = Variable::new(7_i64);
    let vars = [Liaison::variable("k", &k)];
    assert_eq!(compile("2*k", &vars).unwrap().evaluate().to_pair(), (14, 1));
    assert_eq!(paire("2*k"), (2000, 1));
}

#[test]
fn sci_fonctions_de_l_appelant() {
    fn moyenne(args: &[Valeur]) -> Valeur {
        let somme = args.iter().fold(Valeur::zero(), |acc, v| add(acc, *v));
        super::rationnel::divide(somme, Valeur::entier(args.len() as i64))
    }
    let vars = [Liaison::fonction("moy", 3, moyenne)];
    assert_eq!(compile("moy(1, 2, 4)", &vars).unwrap().evaluate().to_pair(), (7, 3));
    assert!(matches!(
        compile("moy(1, 2)", &vars),
        Err(ErreurCompilation::NombreArguments { attendu: 3, .. })
    ));

    let trop = [Liaison::fonction("f8", 8, moyenne)];
    assert!(matches!(
        compile("1", &trop),
        Err(ErreurCompilation::AriteHorsLimite { arite: 8, .. })
    ));
}

#[test]
fn sci_fermeture_pure_pliee_une_fois() {
    fn compte(args: &[Valeur], ctx: &dyn Any) -> Valeur {
        if let Some(c) = ctx.downcast_ref::<Cell<i64>>() {
            c.set(c.get() + 1);
        }
        args[0]
    }
    let appels = Rc::new(Cell::new(0_i64));
    let ctx: Rc<dyn Any> = appels.clone();
    let vars = [Liaison::fermeture("id", 1, compte, ctx)];

    let e = compile("id(2) + 1", &vars).unwrap();
    assert_eq!(appels.get(), 1);
    assert_eq!(e.evaluate().to_pair(), (3, 1));
    assert_eq!(e.evaluate().to_pair(), (3, 1));
    assert_eq!(appels.get(), 1);
}

#[test]
fn sci_fermeture_impure_jamais_pliee() {
    fn tirage(_: &[Valeur], ctx: &dyn Any) -> Valeur {
        match ctx.downcast_ref::<Cell<i64>>() {
            Some(c) => {
                c.set(c.get() + 1);
                Valeur::entier(c.get())
            }
            None => Valeur::Indefini,
        }
    }
    let etat = Rc::new(Cell::new(0_i64));
    let ctx: Rc<dyn Any> = etat.clone();
    let vars = [Liaison::fermeture("tirage", 0, tirage, ctx).impure()];

    let e = compile("tirage * (2 + 3)", &vars).unwrap();
    assert_eq!(etat.get(), 0);
    assert_eq!(e.evaluate().to_pair(), (5, 1));
    assert_eq!(e.evaluate().to_pair(), (10, 1));
    // (2 + 3) a bien été plié
    assert!(e.racine().enfants()[1].est_constante());
}

/* ------------------------ Démarche ------------------------ */

#[test]
fn sci_demarche_complete() {
    let x = Variable::new(2_i64);
    let vars = [Liaison::variable("x", &x)];
    let (v, d) = eval_expression("x * (1.5 + 1/2)", &vars).unwrap();
    assert_eq!(v.to_pair(), (4, 1));
    assert_eq!(d.jetons, "x * ( 3/2 + 1 / 2 )");
    assert_eq!(d.avant, "x * (3/2 + 1 / 2)");
    assert_eq!(d.apres, "x * 2");
    assert!(d.note.contains("2 pliage(s)"), "note={}", d.note);
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 400 termes : hauteur 400, sous la borne par défaut
    let expr = vec!["1/2"; 400].join(" + ");
    budget(t0, max);

    assert_eq!(paire(&expr), (200, 1));
    budget(t0, max);
}

#[test]
fn sci_stress_fractions_reduites() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // somme télescopique 1/(k(k+1)) = 1 - 1/(n+1)
    let mut expr = String::new();
    for k in 1..=60 {
        if k > 1 {
            expr.push_str(" + ");
        }
        expr.push_str(&format!("1/({k}*{})", k + 1));
        budget(t0, max);
    }
    assert_eq!(paire(&expr), (60, 61));
}

//! Formatação compacta de números de ponto flutuante.
//!
//! Reproduz o verbo `%g` clássico com precisão mínima: os dígitos são os
//! menores que fazem round-trip e a notação científica só aparece quando o
//! expoente decimal é menor que -4 ou maior/igual a 6.
//!
//! ```text
//! 10.0      → 10
//! 0.5       → 0.5
//! 1000000.0 → 1e+06
//! 0.00001   → 1e-05
//! ```

/// Expoente a partir do qual a notação científica é usada.
const SCI_EXP_HIGH: i32 = 6;

/// Expoente abaixo do qual a notação científica é usada.
const SCI_EXP_LOW: i32 = -4;

/// Formata um valor no formato compacto aceito pelo monitoring host.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "NaN".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.into();
    }

    // `{:e}` já devolve os dígitos mínimos: "1.2345e3", "-1e-7", "0e0"
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return format!("{v}");
    };
    let exp: i32 = match exp.parse() {
        Ok(e) => e,
        Err(_) => return format!("{v}"),
    };

    if exp < SCI_EXP_LOW || exp >= SCI_EXP_HIGH {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    } else {
        format!("{v}")
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

//! Reed-Solomon error correction over GF(2**8)
//!
//! Corrects a codeword block in place: compute syndromes, derive the error
//! locator polynomial with Berlekamp-Massey, locate error positions with a
//! Chien search, and compute magnitudes with Forney's formula. The block is
//! the polynomial with `codewords[0]` as its highest-power coefficient and
//! parity generated from the consecutive roots alpha^0 .. alpha^(k-1).

use crate::error::{Error, Result};
use crate::galois;

/// Correct up to floor(k/2) byte errors in `codewords`, whose trailing
/// `num_ec_codewords` bytes are parity. Returns the number of errors
/// repaired, or [`Error::Checksum`] when the block is beyond repair.
pub(crate) fn correct_errors(codewords: &mut [u8], num_ec_codewords: usize) -> Result<usize> {
    let n = codewords.len();
    if num_ec_codewords == 0 || num_ec_codewords > n {
        return Err(Error::Checksum);
    }

    let syndromes = compute_syndromes(codewords, num_ec_codewords);
    if syndromes.iter().all(|&s| s == 0) {
        return Ok(0);
    }

    let sigma = berlekamp_massey(&syndromes)?;
    let num_errors = sigma.len() - 1;
    if num_errors == 0 || 2 * num_errors > num_ec_codewords {
        return Err(Error::Checksum);
    }

    let positions = chien_search(&sigma, n);
    if positions.len() != num_errors {
        return Err(Error::Checksum);
    }

    // omega(x) = sigma(x) * S(x) mod x^k
    let omega = galois::poly_mul_truncated(&sigma, &syndromes, num_ec_codewords);

    for &pos in &positions {
        let x = galois::alpha_pow((n - 1 - pos) % 255);
        let x_inv = galois::inv(x);
        let numerator = galois::poly_eval(&omega, x_inv);
        let denominator = eval_derivative(&sigma, x_inv);
        if denominator == 0 {
            return Err(Error::Checksum);
        }
        let magnitude = galois::mul(x, galois::div(numerator, denominator));
        codewords[pos] ^= magnitude;
    }

    // The corrected block must be a proper codeword again; a residual
    // syndrome means the locator described an inconsistent error pattern.
    let check = compute_syndromes(codewords, num_ec_codewords);
    if check.iter().any(|&s| s != 0) {
        return Err(Error::Checksum);
    }

    Ok(num_errors)
}

/// S_i = c(alpha^i) for i in 0..k, with descending-power coefficients.
fn compute_syndromes(codewords: &[u8], num_ec_codewords: usize) -> Vec<u8> {
    let mut syndromes = vec![0u8; num_ec_codewords];
    for (i, syndrome) in syndromes.iter_mut().enumerate() {
        let alpha_i = galois::alpha_pow(i);
        let mut acc = 0u8;
        for &c in codewords {
            acc = c ^ galois::mul(acc, alpha_i);
        }
        *syndrome = acc;
    }
    syndromes
}

/// Error locator polynomial sigma(x), ascending coefficients, sigma[0] = 1.
fn berlekamp_massey(syndromes: &[u8]) -> Result<Vec<u8>> {
    let mut sigma = vec![1u8];
    let mut prev = vec![1u8];
    let mut prev_discrepancy = 1u8;
    let mut degree = 0usize;
    let mut gap = 1usize;

    for i in 0..syndromes.len() {
        let mut discrepancy = syndromes[i];
        for j in 1..=degree {
            discrepancy ^= galois::mul(sigma[j], syndromes[i - j]);
        }

        if discrepancy == 0 {
            gap += 1;
            continue;
        }

        let scale = galois::div(discrepancy, prev_discrepancy);
        let grow = 2 * degree <= i;
        let snapshot = if grow { Some(sigma.clone()) } else { None };

        if sigma.len() < prev.len() + gap {
            sigma.resize(prev.len() + gap, 0);
        }
        for (j, &p) in prev.iter().enumerate() {
            sigma[j + gap] ^= galois::mul(scale, p);
        }

        if let Some(snapshot) = snapshot {
            prev = snapshot;
            prev_discrepancy = discrepancy;
            degree = i + 1 - degree;
            gap = 1;
        } else {
            gap += 1;
        }
    }

    while sigma.len() > 1 && *sigma.last().unwrap() == 0 {
        sigma.pop();
    }
    // A trailing degree above the tracked one means the iteration diverged.
    if sigma.len() - 1 != degree {
        return Err(Error::Checksum);
    }
    Ok(sigma)
}

/// Positions i in 0..n where sigma(alpha^-(n-1-i)) = 0.
fn chien_search(sigma: &[u8], n: usize) -> Vec<usize> {
    let mut positions = Vec::with_capacity(sigma.len() - 1);
    for pos in 0..n {
        let exponent = (n - 1 - pos) % 255;
        let x_inv = galois::alpha_pow(255 - exponent);
        if galois::poly_eval(sigma, x_inv) == 0 {
            positions.push(pos);
        }
    }
    positions
}

/// Formal derivative of sigma evaluated at `x`: odd-power terms only, since
/// even-multiplicity coefficients cancel in characteristic 2.
fn eval_derivative(sigma: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    let mut x_power = 1u8;
    for i in (1..sigma.len()).step_by(2) {
        acc ^= galois::mul(sigma[i], x_power);
        x_power = galois::mul(x_power, galois::mul(x, x));
    }
    acc
}

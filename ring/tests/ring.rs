use num_bigint::{BigInt, BigUint};
use rlwe_ring::basis_extension::BasisExtender;
use rlwe_ring::modulus::generation::generate_ntt_primes;
use primality_test::is_prime;
use rlwe_ring::num_bigint::Div;
use rlwe_ring::poly::PolyRNS;
use rlwe_ring::pool::PolyPool;
use rlwe_ring::ring::Context;
use rlwe_ring::scaling::SimpleScaler;
use rlwe_ring::serialization::WriterTo;
use sampling::source::Source;

const Q: [u64; 3] = [0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001];
const P: [u64; 2] = [0x1fffffffff500001, 0x1fffffffff380001];

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn contexts() -> Vec<Context> {
    [(16, 1), (64, 2), (1024, 3)]
        .iter()
        .map(|&(n, limbs)| Context::new(n, &Q[..limbs]).unwrap())
        .collect()
}

fn random_bigints(context: &Context, source: &mut Source) -> Vec<BigInt> {
    let a: PolyRNS<u64> = context.new_uniform_poly_from(source).unwrap();
    context.to_bigint_centered(&a).unwrap()
}

#[test]
fn transforms() {
    for context in contexts() {
        let name = format!("n={}/limbs={}", context.n(), context.limbs());
        let mut source: Source = Source::new([0u8; 32]);

        sub_test(&format!("{}/ntt_round_trip", name), || {
            let a = context.new_uniform_poly_from(&mut source).unwrap();
            let mut b = context.new_poly();
            context.ntt(&a, &mut b).unwrap();
            assert!(b.is_ntt());
            assert!(!context.equal(&a, &b));
            context.inv_ntt_inplace(&mut b).unwrap();
            assert!(context.equal(&a, &b));
        });

        sub_test(&format!("{}/bit_reverse_involution", name), || {
            let a = context.new_uniform_poly_from(&mut source).unwrap();
            let mut b = context.new_poly();
            context.bit_reverse(&a, &mut b).unwrap();
            context.bit_reverse_inplace(&mut b).unwrap();
            assert_eq!(a, b);
        });

        sub_test(&format!("{}/reduce_idempotent", name), || {
            let a = context.new_uniform_poly_from(&mut source).unwrap();
            let mut b = context.new_poly();
            context.reduce(&a, &mut b).unwrap();
            assert_eq!(a, b);
            context.reduce_inplace(&mut b).unwrap();
            assert_eq!(a, b);
        });
    }
}

#[test]
fn multiplication() {
    for context in contexts().into_iter().take(2) {
        let name = format!("n={}/limbs={}", context.n(), context.limbs());
        let mut source: Source = Source::new([0u8; 32]);
        let a = context.new_uniform_poly_from(&mut source).unwrap();
        let b = context.new_uniform_poly_from(&mut source).unwrap();

        let mut want = context.new_poly();
        context.mul_poly_naive(&a, &b, &mut want).unwrap();

        sub_test(&format!("{}/mul_poly", name), || {
            let mut c = context.new_poly();
            context.mul_poly(&a, &b, &mut c).unwrap();
            assert_eq!(c, want);
        });

        sub_test(&format!("{}/mul_poly_pooled", name), || {
            let mut pool = PolyPool::new();
            let mut c = context.new_poly();
            context.mul_poly_pooled(&mut pool, &a, &b, &mut c).unwrap();
            context.mul_poly_pooled(&mut pool, &a, &b, &mut c).unwrap();
            assert_eq!(c, want);
            assert_eq!(pool.allocated(), 2);
        });

        sub_test(&format!("{}/mul_poly_montgomery", name), || {
            let mut a_m = context.new_poly();
            context.mform(&a, &mut a_m).unwrap();

            let mut c = context.new_poly();
            context.mul_poly_montgomery(&a_m, &b, &mut c).unwrap();
            assert_eq!(c, want);

            let mut c = context.new_poly();
            context.mul_poly_naive_montgomery(&a_m, &b, &mut c).unwrap();
            assert_eq!(c, want);

            // Both operands in Montgomery form: the product stays in Montgomery form.
            let mut b_m = context.new_poly();
            context.mform(&b, &mut b_m).unwrap();
            context.mul_poly_montgomery(&a_m, &b_m, &mut c).unwrap();
            assert!(c.is_montgomery());
            context.inv_mform_inplace(&mut c).unwrap();
            assert_eq!(c, want);
        });

        sub_test(&format!("{}/mul_coeffs_montgomery", name), || {
            let mut a_ntt = context.new_poly();
            let mut b_ntt = context.new_poly();
            context.ntt(&a, &mut a_ntt).unwrap();
            context.ntt(&b, &mut b_ntt).unwrap();
            let mut plain = context.new_poly();
            context.mul_coeffs(&a_ntt, &b_ntt, &mut plain).unwrap();

            context.mform_inplace(&mut a_ntt).unwrap();
            context.mul_coeffs_montgomery_inplace(&a_ntt, &mut b_ntt).unwrap();
            assert_eq!(b_ntt, plain);
        });
    }
}

#[test]
fn rotations() {
    let context = Context::new(64, &Q[..2]).unwrap();
    let mut source: Source = Source::new([0u8; 32]);
    let a = context.new_uniform_poly_from(&mut source).unwrap();
    let n: usize = context.n();

    sub_test("rotate_equals_shift", || {
        for k in [0, 1, 5, n - 1, n + 3] {
            let mut b = context.new_poly();
            context.bit_reverse(&a, &mut b).unwrap();
            context.inv_ntt_inplace(&mut b).unwrap();
            context.rotate_inplace(k, &mut b).unwrap();
            context.ntt_inplace(&mut b).unwrap();
            context.bit_reverse_inplace(&mut b).unwrap();
            context.reduce_inplace(&mut b).unwrap();

            let mut want = context.new_poly();
            context.shift(&a, k, &mut want).unwrap();
            assert_eq!(b, want, "k={}", k);
        }
    });

    sub_test("mult_by_monomial_composes", || {
        for (x, y) in [(1, 8), (3, n - 1), (n, n), (n - 1, n + 2), (2 * n - 1, 2 * n - 1)] {
            let mut b = context.new_poly();
            context.mult_by_monomial(&a, x, &mut b).unwrap();
            context.mult_by_monomial_inplace(y, &mut b).unwrap();
            let mut want = context.new_poly();
            context.mult_by_monomial(&a, (x + y) % (2 * n), &mut want).unwrap();
            assert_eq!(b, want, "x={} y={}", x, y);
        }
    });

    sub_test("mult_by_monomial_matches_mul_poly", || {
        let mut monomial = context.new_poly();
        let mut coeffs: Vec<i64> = vec![0; n];
        coeffs[3] = 1;
        context.set_coefficients_i64(&coeffs, &mut monomial).unwrap();
        let mut want = context.new_poly();
        context.mul_poly(&a, &monomial, &mut want).unwrap();
        let mut b = context.new_poly();
        context.mult_by_monomial(&a, 3, &mut b).unwrap();
        assert_eq!(b, want);
    });

    sub_test("automorphism_domains_agree", || {
        for gal_el in [3usize, 5, 2 * n - 1] {
            let mut want = context.new_poly();
            context.automorphism(&a, gal_el, &mut want).unwrap();

            let mut a_ntt = context.new_poly();
            context.ntt(&a, &mut a_ntt).unwrap();
            let mut b = context.new_poly();
            context.automorphism_ntt(&a_ntt, gal_el, &mut b).unwrap();
            context.inv_ntt_inplace(&mut b).unwrap();
            assert_eq!(b, want, "gal_el={}", gal_el);
        }
        let mut b = context.new_poly();
        assert!(context.automorphism(&a, 4, &mut b).is_err());
    });
}

#[test]
fn scalars() {
    let context = Context::new(64, &Q).unwrap();
    let mut source: Source = Source::new([0u8; 32]);
    let a = context.new_uniform_poly_from(&mut source).unwrap();

    sub_test("mul_scalar_bigint", || {
        for (x, y) in [(0xfffffffffu64, 0x123456789abcdefu64), (u64::MAX, u64::MAX - 1), (3, 7)] {
            let mut want = context.new_poly();
            context.mul_scalar(&a, x, &mut want).unwrap();
            context.mul_scalar_inplace(y, &mut want).unwrap();

            let mut b = context.new_poly();
            let scalar: BigInt = BigInt::from(x) * BigInt::from(y);
            context.mul_scalar_bigint(&a, &scalar, &mut b).unwrap();
            assert_eq!(b, want);
        }
    });

    sub_test("mul_scalar_bigint_negative", || {
        let mut b = context.new_poly();
        context.mul_scalar_bigint(&a, &BigInt::from(-1), &mut b).unwrap();
        let mut want = context.new_poly();
        context.neg(&a, &mut want).unwrap();
        assert_eq!(b, want);
    });
}

#[test]
fn add_sub_neg() {
    let context = Context::new(64, &Q).unwrap();
    let mut source: Source = Source::new([0u8; 32]);
    let a = context.new_uniform_poly_from(&mut source).unwrap();
    let b = context.new_uniform_poly_from(&mut source).unwrap();

    let mut c = context.new_poly();
    context.add(&a, &b, &mut c).unwrap();
    context.sub_inplace(&b, &mut c).unwrap();
    assert_eq!(c, a);

    let mut d = context.new_poly();
    context.sub(&a, &a, &mut d).unwrap();
    assert!(d.iter().all(|p| p.0.iter().all(|&x| x == 0)));

    let mut e = context.new_poly();
    context.neg(&a, &mut e).unwrap();
    context.add_inplace(&a, &mut e).unwrap();
    assert_eq!(e, d);

    let a_big = context.to_bigint_centered(&a).unwrap();
    let b_big = context.to_bigint_centered(&b).unwrap();
    let mut f = context.new_poly();
    context.add(&a, &b, &mut f).unwrap();
    let sum: Vec<BigInt> = a_big.iter().zip(b_big.iter()).map(|(x, y)| x + y).collect();
    let mut want = context.new_poly();
    context.set_coefficients_bigint(&sum, &mut want).unwrap();
    assert_eq!(f, want);
}

#[test]
fn basis_extension_and_scaling() {
    let n: usize = 64;
    let context_q = Context::new(n, &Q).unwrap();
    let context_p = Context::new(n, &P).unwrap();
    let moduli_qp: Vec<u64> = Q.iter().chain(P.iter()).copied().collect();
    let context_qp = Context::new(n, &moduli_qp).unwrap();
    let mut source: Source = Source::new([0u8; 32]);

    sub_test("extend_basis", || {
        let extender = BasisExtender::new(&context_q, &context_p).unwrap();
        let a = context_q.new_uniform_poly_from(&mut source).unwrap();
        let coeffs: Vec<BigUint> = context_q.to_biguint(&a).unwrap();
        let coeffs: Vec<BigInt> = coeffs.into_iter().map(BigInt::from).collect();

        let mut want = context_qp.new_poly();
        context_qp.set_coefficients_bigint(&coeffs, &mut want).unwrap();

        let mut b = context_qp.new_poly();
        extender.extend_basis(&a, &mut b).unwrap();
        assert_eq!(b, want);

        let copy = extender.shallow_copy();
        let mut c = a.copy_new();
        copy.extend_basis_inplace(&mut c).unwrap();
        assert_eq!(c, want);
    });

    sub_test("simple_scaling", || {
        let t: u64 = 65537;
        let context_t = Context::new(n, &[t]).unwrap();
        let scaler = SimpleScaler::new(t, &context_q).unwrap();
        let a = context_q.new_uniform_poly_from(&mut source).unwrap();
        let coeffs: Vec<BigUint> = context_q.to_biguint(&a).unwrap();
        let q: &BigUint = context_q.modulus();
        let want: Vec<BigInt> = coeffs
            .iter()
            .map(|c| BigInt::from((c * t).div_round(q) % t))
            .collect();
        let mut want_poly = context_t.new_poly();
        context_t.set_coefficients_bigint(&want, &mut want_poly).unwrap();

        let mut b = context_t.new_poly();
        scaler.scale_to(&a, &context_t, &mut b).unwrap();
        assert_eq!(b, want_poly);

        let mut c = a.copy_new();
        scaler.scale_inplace(&mut c).unwrap();
        assert_eq!(c.at(0), want_poly.at(0));
    });
}

#[test]
fn rescaling() {
    let context = Context::new(64, &Q).unwrap();
    let mut source: Source = Source::new([0u8; 32]);

    sub_test("div_round_by_last_modulus_many", || {
        let coeffs: Vec<BigInt> = context
            .to_biguint(&context.new_uniform_poly_from(&mut source).unwrap())
            .unwrap()
            .into_iter()
            .map(BigInt::from)
            .collect();
        let mut a = context.new_poly();
        context.set_coefficients_bigint(&coeffs, &mut a).unwrap();
        let mut a_ntt = context.new_poly();
        context.ntt(&a, &mut a_ntt).unwrap();

        context.div_round_by_last_modulus_many(&mut a, 2).unwrap();
        context.div_round_by_last_modulus_many_ntt(&mut a_ntt, 2).unwrap();
        assert_eq!(a.limbs(), 1);

        let lower = context.at_level(0).unwrap();
        lower.inv_ntt_inplace(&mut a_ntt).unwrap();
        assert_eq!(a, a_ntt);

        // Rounding at each step may differ from a single rounding by one.
        let divisor: BigInt = BigInt::from(Q[1]) * BigInt::from(Q[2]);
        let got: Vec<BigUint> = lower.to_biguint(&a).unwrap();
        for (c, g) in coeffs.iter().zip(got.iter()) {
            let want: BigInt = c.div_round(&divisor);
            let diff: BigInt = BigInt::from(g.clone()) - want;
            assert!(diff >= BigInt::from(-1) && diff <= BigInt::from(1));
        }
    });

    sub_test("div_floor_by_last_modulus_many", || {
        let coeffs: Vec<BigInt> = context
            .to_biguint(&context.new_uniform_poly_from(&mut source).unwrap())
            .unwrap()
            .into_iter()
            .map(BigInt::from)
            .collect();
        let mut a = context.new_poly();
        context.set_coefficients_bigint(&coeffs, &mut a).unwrap();
        context.div_floor_by_last_modulus_many(&mut a, 2).unwrap();

        // Nested floors compose exactly for non-negative values.
        let divisor: BigInt = BigInt::from(Q[1]) * BigInt::from(Q[2]);
        let want: Vec<BigInt> = coeffs.iter().map(|c| c.div_floor(&divisor)).collect();
        let lower = context.at_level(0).unwrap();
        let mut want_poly = lower.new_poly();
        lower.set_coefficients_bigint(&want, &mut want_poly).unwrap();
        assert_eq!(a, want_poly);
    });
}

#[test]
fn conversions() {
    let context = Context::new(64, &Q).unwrap();
    let mut source: Source = Source::new([0u8; 32]);

    sub_test("string_round_trip", || {
        let a = context.new_uniform_poly_from(&mut source).unwrap();
        let strings: Vec<String> = context.poly_to_string(&a).unwrap();
        let mut b = context.new_poly();
        context.set_coefficients_string(&strings, &mut b).unwrap();
        assert_eq!(a, b);
    });

    sub_test("centered_bigint_round_trip", || {
        let coeffs: Vec<BigInt> = random_bigints(&context, &mut source);
        let mut a = context.new_poly();
        context.set_coefficients_bigint(&coeffs, &mut a).unwrap();
        assert_eq!(context.to_bigint_centered(&a).unwrap(), coeffs);
    });
}

#[test]
fn serialization() {
    for context in contexts() {
        let name = format!("n={}/limbs={}", context.n(), context.limbs());
        sub_test(&format!("{}/context", name), || {
            let data: Vec<u8> = context.marshal().unwrap();
            assert_eq!(data.len(), context.binary_size());
            let decoded: Context = Context::unmarshal(&data).unwrap();
            assert_eq!(decoded.n(), context.n());
            assert_eq!(decoded.moduli(), context.moduli());
            assert_eq!(decoded.bit_reverse_table(), context.bit_reverse_table());
        });

        sub_test(&format!("{}/poly", name), || {
            let a = context
                .new_uniform_poly_from(&mut Source::new([0u8; 32]))
                .unwrap();
            let data: Vec<u8> = a.marshal().unwrap();
            let b = context.unmarshal_poly(&data).unwrap();
            assert_eq!(a, b);
            assert!(context.unmarshal_poly(&data[..data.len() - 1]).is_err());
        });
    }
}

#[test]
fn prime_generation() {
    let n: usize = 1 << 12;
    let primes: Vec<u64> = generate_ntt_primes(n, Q[0], 8, 61, true).unwrap();
    assert_eq!(primes.len(), 8);
    for (i, &q) in primes.iter().enumerate() {
        assert!(is_prime(q));
        assert_eq!(q % (2 * n as u64), 1);
        assert_eq!(u64::BITS - q.leading_zeros(), 61);
        assert!(!primes[i + 1..].contains(&q));
    }
    assert!(generate_ntt_primes(n, 1 << 10, 1000, 11, true).is_err());
}

#[test]
fn crp_clock() {
    use rlwe_ring::sampler::CRPGenerator;

    let context = Context::new(1024, &Q).unwrap();
    let seed: [u8; 32] = [42u8; 32];
    let mut a = CRPGenerator::new(&context, seed);
    let mut b = CRPGenerator::new(&context, seed);
    a.seed(seed);
    b.seed(seed);
    a.set_clock(256).unwrap();
    b.set_clock(256).unwrap();
    let p0 = a.clock();
    let p1 = b.clock();
    assert!(context.equal(&p0, &p1));
    assert_eq!(a.current_clock(), 257);

    let mut c = CRPGenerator::new(&context, [43u8; 32]);
    c.set_clock(256).unwrap();
    assert!(!context.equal(&p0, &c.clock()));
}

#[test]
fn samplers() {
    use rlwe_ring::sampler::{KYSampler, TernarySampler, DEFAULT_SIGMA, default_bound};

    let context = Context::new(1024, &Q[..2]).unwrap();
    let q: u64 = Q[0];
    let centered = |x: u64| if x > q / 2 { -((q - x) as i64) } else { x as i64 };

    sub_test("gaussian_shape", || {
        let bound: usize = default_bound(DEFAULT_SIGMA);
        let mut sampler = KYSampler::new_default(&context, DEFAULT_SIGMA, Source::new([0u8; 32])).unwrap();
        let values: Vec<i64> = (0..8)
            .flat_map(|_| sampler.sample_new().unwrap().at(0).0.clone())
            .map(centered)
            .collect();
        assert!(values.iter().all(|x| x.unsigned_abs() as usize <= bound));
        let len: f64 = values.len() as f64;
        let mean: f64 = values.iter().sum::<i64>() as f64 / len;
        let std: f64 = (values.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / len).sqrt();
        assert!(mean.abs() < 0.2, "mean={}", mean);
        assert!((std - DEFAULT_SIGMA).abs() < 0.2, "std={}", std);

        let mut other = KYSampler::new(&context, DEFAULT_SIGMA, bound, Source::new([1u8; 32])).unwrap();
        let mut again = KYSampler::new(&context, DEFAULT_SIGMA, bound, Source::new([0u8; 32])).unwrap();
        let first = again.sample_new().unwrap();
        assert_ne!(first, other.sample_new().unwrap());
    });

    sub_test("ternary_shape", || {
        let mut sampler = TernarySampler::new(&context, 0.5, Source::new([0u8; 32])).unwrap();
        let a = sampler.sample_new().unwrap();
        let values: Vec<i64> = a.at(0).0.iter().map(|&x| centered(x)).collect();
        assert!(values.iter().all(|&x| (-1..=1).contains(&x)));
        let nonzero: usize = values.iter().filter(|&&x| x != 0).count();
        assert!((400..624).contains(&nonzero), "nonzero={}", nonzero);
        for (x, y) in a.at(0).0.iter().zip(a.at(1).0.iter()) {
            assert_eq!(*x == Q[0] - 1, *y == Q[1] - 1);
        }
    });
}

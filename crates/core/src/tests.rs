//! Tests for the VerusHash engine

use crate::{
    Backend, BackendPolicy, Engine, Error, Setup, Variant, Version, core_for, hash, reverse,
};

fn sample_inputs() -> Vec<Vec<u8>> {
    (0..16u8)
        .map(|i| {
            let mut input = b"block header candidate ".to_vec();
            input.extend_from_slice(&[i; 9]);
            input
        })
        .collect()
}

#[test]
fn test_basic_hash() {
    let engine = Engine::new();
    let input = b"test input data";

    for version in Version::ALL {
        let result = engine.hash(Variant::forward(version), input).unwrap();

        // Hash should be 32 bytes
        assert_eq!(result.len(), 32);

        // Hash should be deterministic
        let result2 = engine.hash(Variant::forward(version), input).unwrap();
        assert_eq!(result, result2);
    }
}

#[test]
fn test_different_inputs_produce_different_hashes() {
    let engine = Engine::new();
    for version in Version::ALL {
        let hash1 = engine.hash(Variant::forward(version), b"input 1").unwrap();
        let hash2 = engine.hash(Variant::forward(version), b"input 2").unwrap();
        assert_ne!(hash1, hash2, "{version} collided");
    }
}

#[test]
fn test_avalanche_effect() {
    let engine = Engine::new();
    let input1 = b"test input";
    let mut input2 = input1.to_vec();
    input2[0] ^= 1;

    for version in Version::ALL {
        let hash1 = engine.hash(Variant::forward(version), input1).unwrap();
        let hash2 = engine.hash(Variant::forward(version), &input2).unwrap();

        let diff_bits: u32 = hash1
            .iter()
            .zip(hash2.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();

        // Expect roughly 128 of 256 bits to differ
        assert!(
            (80..=176).contains(&diff_bits),
            "{version}: {diff_bits} bits differ (expected ~128)"
        );
    }
}

#[test]
fn test_reverse_variants_reverse_the_digest() {
    let engine = Engine::new();
    let input = b"reversed output, not reversed input";

    let pairs = [
        (engine.hash_v1(input), engine.hash_v1_reverse(input)),
        (engine.hash_v2(input), engine.hash_v2_reverse(input)),
        (engine.hash_v2b(input), engine.hash_v2b_reverse(input)),
        (engine.hash_v2b1(input), engine.hash_v2b1_reverse(input)),
    ];

    for (forward, reversed) in pairs {
        let mut expected = forward.unwrap();
        reverse(&mut expected);
        assert_eq!(reversed.unwrap(), expected);
    }
}

#[test]
fn test_named_operations_alias_hash() {
    let engine = Engine::new();
    let input = b"alias check";

    assert_eq!(
        engine.hash_v2(input).unwrap(),
        engine.hash("v2".parse().unwrap(), input).unwrap()
    );
    assert_eq!(
        engine.hash_v2b1_reverse(input).unwrap(),
        engine.hash("v2b1_reverse".parse().unwrap(), input).unwrap()
    );
}

#[test]
fn test_digest_width_independent_of_input_length() {
    let engine = Engine::new();
    for len in [1usize, 31, 32, 33, 64, 80, 1487, 4096] {
        let input = vec![0x5cu8; len];
        for variant in Variant::ALL {
            assert_eq!(engine.hash(variant, &input).unwrap().len(), 32);
        }
    }
}

#[test]
fn test_versions_differ() {
    let engine = Engine::new();
    let inputs = sample_inputs();

    // V1 has no CLHash stage, so it differs on any input
    let input = &inputs[0];
    let v1 = engine.hash_v1(input).unwrap();
    assert_ne!(v1, engine.hash_v2(input).unwrap());
    assert_ne!(v1, engine.hash_v2b(input).unwrap());
    assert_ne!(v1, engine.hash_v2b1(input).unwrap());

    // The mixer generations only diverge when an input reaches the
    // operations they changed; across a handful of inputs some must.
    let diverges = |a: Version, b: Version| {
        inputs.iter().any(|input| {
            engine.hash(Variant::forward(a), input).unwrap()
                != engine.hash(Variant::forward(b), input).unwrap()
        })
    };
    assert!(diverges(Version::V2, Version::V2b));
    assert!(diverges(Version::V2b, Version::V2b1));
}

#[test]
fn test_invalid_lengths_rejected() {
    let engine = Engine::new();
    for variant in Variant::ALL {
        let err = engine.hash(variant, &[]).unwrap_err();
        assert!(
            matches!(err, Error::InvalidInputLength { len: 0, min: 1, .. }),
            "{variant}: {err}"
        );
    }
}

#[test]
fn test_unknown_variants_rejected() {
    assert!(matches!(
        "v3_reverse".parse::<Variant>(),
        Err(Error::UnsupportedVariant(_))
    ));
    assert_eq!(
        Variant::from_code(42),
        Err(Error::UnsupportedVariantCode(42))
    );
}

#[test]
fn test_initialize_is_idempotent() {
    let engine = Engine::new();
    let before = engine.hash_v2b1(b"stable").unwrap();

    let first = engine.initialize().unwrap();
    let second = engine.initialize().unwrap();
    assert!(core::ptr::eq(first, second));
    assert!(engine.is_initialized());

    assert_eq!(engine.hash_v2b1(b"stable").unwrap(), before);
}

#[test]
fn test_concurrent_first_calls() {
    let engine = Engine::new();
    let input = b"concurrent";

    let digests: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let digest = engine.hash_v2b(input).unwrap();
                    assert!(engine.is_initialized());
                    digest
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(digests.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_engines_share_setup() {
    let a = Engine::new();
    let b = Engine::with_policy(BackendPolicy::BestAvailable);
    assert!(core::ptr::eq(a.initialize().unwrap(), b.initialize().unwrap()));
    assert_eq!(a.hash_v2(b"shared").unwrap(), b.hash_v2(b"shared").unwrap());
}

#[test]
fn test_backends_agree() {
    if !Backend::AesNi.is_supported() {
        return;
    }

    let portable = Setup::for_backend(Backend::Portable).unwrap();
    let accelerated = Setup::for_backend(Backend::AesNi).unwrap();

    for input in sample_inputs().iter().chain([&vec![0u8; 140]]) {
        for version in Version::ALL {
            let core = core_for(version);
            assert_eq!(
                core.compress(&portable, input),
                core.compress(&accelerated, input),
                "{version} backends disagree"
            );
        }
    }
}

/// Digests of `b"a"`, bytes `0..32` and bytes `0..100`, one row per version
const KNOWN_ANSWERS: [(Version, [&str; 3]); 4] = [
    (
        Version::V1,
        [
            "48f3923eea7820d1120e7aa98fa5b2fe9824d31aeab7c4853b014a412773571d",
            "10ad9a56938da0d3ce897a7f2b1ac55fe32e9dcf89d67a883064052a9d5baea6",
            "614940f202be13019b89388b0ee9577260a4aee19b69852e5b47dbcc686435b7",
        ],
    ),
    (
        Version::V2,
        [
            "6e65321a2e909149a96bdb25e63ff2817f3b46b1b73e6db66de7609f2903c203",
            "b0335a87ea4c274fb2a55f9701c37a6a99d5956ebe265bc804f148837ab011e7",
            "dc02a9563065442b82c538d4c34fdbd655caeb85c4e3edf287c636193b50fcf5",
        ],
    ),
    (
        Version::V2b,
        [
            "629a186c54a21a8ee331e46390c58932cf0b215c53db8c5bc35ea006a60c5a9d",
            "837eb6c6a257c35ce8ae18d210ae78180407cbdfc63a70e1cf53c133aee4cbd5",
            "7cfc33ae377b18dc11983ebd11789349364318ae913969b25471e16f042d1107",
        ],
    ),
    (
        Version::V2b1,
        [
            "85f2fe7836678f7c3d1d84031d1d0d4bd877e2744b5f186ed111555fba693d09",
            "dc37e47215930fa45f12c18aab94250c5045b2b72d1c9c1e8b0548e2f36aa1db",
            "8e4603e39b80332bf3bc8298937d962d9fc4acb79e2a7d5121c263c13d7e664f",
        ],
    ),
];

#[test]
fn test_known_answers() {
    let inputs: [Vec<u8>; 3] = [b"a".to_vec(), (0..32).collect(), (0..100).collect()];

    for backend in [Backend::Portable, Backend::AesNi] {
        let Ok(setup) = Setup::for_backend(backend) else {
            continue;
        };
        for (version, expected) in KNOWN_ANSWERS {
            let core = core_for(version);
            for (input, digest) in inputs.iter().zip(expected) {
                assert_eq!(
                    hex::encode(core.compress(&setup, input)),
                    digest,
                    "{version} on {backend}, {} byte input",
                    input.len()
                );
            }
        }
    }
}

#[test]
fn test_known_answers_reversed() {
    let engine = Engine::new();
    let input: Vec<u8> = (0..32).collect();

    for (version, expected) in KNOWN_ANSWERS {
        let mut digest = engine.hash(Variant::reversed(version), &input).unwrap();
        digest.reverse();
        assert_eq!(hex::encode(digest), expected[1], "{version}");
    }
}

#[test]
fn test_hash_batch_matches_single() {
    let engine = Engine::new();
    let inputs = sample_inputs();
    let variant = Variant::reversed(Version::V2b1);

    let batch = engine.hash_batch(variant, &inputs).unwrap();
    assert_eq!(batch.len(), inputs.len());
    for (input, digest) in inputs.iter().zip(&batch) {
        assert_eq!(*digest, engine.hash(variant, input).unwrap());
    }
}

#[test]
fn test_hash_batch_fails_on_any_invalid_input() {
    let inputs: [&[u8]; 3] = [b"ok", b"", b"also ok"];
    let err = crate::hash_batch(Variant::forward(Version::V1), &inputs).unwrap_err();
    assert!(matches!(err, Error::InvalidInputLength { .. }));
}

#[test]
fn test_default_engine_matches_fresh_engine() {
    let input = b"free function";
    for variant in Variant::ALL {
        assert_eq!(
            hash(variant, input).unwrap(),
            Engine::new().hash(variant, input).unwrap()
        );
    }
}

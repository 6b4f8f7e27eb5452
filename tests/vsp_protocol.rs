//! Integration tests for the VSP activation protocol and partition laws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vspop::prelude::*;

/// Build a population with randomized sexes, affection flags, a random
/// diallelic genotype at two loci, and an `age` information field.
fn random_population(seed: u64, sizes: &[usize]) -> Population {
    let mut rng = StdRng::seed_from_u64(seed);
    let sub_pops = sizes
        .iter()
        .enumerate()
        .map(|(sp, &n)| {
            (0..n)
                .map(|i| {
                    let sex = if rng.random_bool(0.5) {
                        Sex::Male
                    } else {
                        Sex::Female
                    };
                    let copy1 = vec![rng.random_range(0..2u32), rng.random_range(0..2u32)];
                    let copy2 = vec![rng.random_range(0..2u32), rng.random_range(0..2u32)];
                    Individual::new(format!("{sp}-{i}"), sex, copy1, copy2)
                        .with_affected(rng.random_bool(0.3))
                        .with_info("age", rng.random_range(0..90) as f64)
                })
                .collect()
        })
        .collect();
    Population::new("random", sub_pops)
}

fn all_splitters() -> Vec<Box<dyn Splitter>> {
    vec![
        Box::new(SexSplitter::new()),
        Box::new(AffectionSplitter::new()),
        Box::new(InfoSplitter::by_cutoffs("age", vec![18.0, 65.0]).unwrap()),
        Box::new(InfoSplitter::by_ranges("age", vec![[0.0, 30.0], [20.0, 90.0]]).unwrap()),
        Box::new(ProportionSplitter::new(vec![0.2, 0.5, 0.3]).unwrap()),
        Box::new(RangeSplitter::new(vec![[0, 10], [10, 40]]).unwrap()),
        Box::new(GenotypeSplitter::new(vec![0], vec![vec![0, 0], vec![0, 1], vec![1, 1]], false).unwrap()),
        Box::new(
            ProductSplitter::new(vec![
                Box::new(SexSplitter::new()),
                Box::new(AffectionSplitter::new()),
            ])
            .unwrap(),
        ),
        Box::new(
            CombinedSplitter::with_unions(
                vec![
                    Box::new(SexSplitter::new()),
                    Box::new(AffectionSplitter::new()),
                ],
                vec![vec![0, 3]],
            )
            .unwrap(),
        ),
    ]
}

#[test]
fn activate_deactivate_restores_visibility_for_every_splitter() {
    for (which, mut splitter) in all_splitters().into_iter().enumerate() {
        let mut pop = random_population(7, &[40, 25]);
        for sub_pop in 0..pop.num_sub_pops() {
            for vsp in 0..splitter.num_virtual_subpops() {
                splitter.activate(&mut pop, sub_pop, vsp).unwrap();
                assert_eq!(
                    pop.num_visible(sub_pop).unwrap(),
                    splitter.size(&pop, sub_pop, vsp).unwrap(),
                    "splitter {which}, sub_pop {sub_pop}, vsp {vsp}"
                );
                splitter.deactivate(&mut pop, sub_pop).unwrap();
                assert_eq!(
                    pop.num_visible(sub_pop).unwrap(),
                    pop.sub_pop_size(sub_pop).unwrap(),
                    "round trip failed for splitter {which}"
                );
            }
        }
    }
}

#[test]
fn size_always_agrees_with_contains() {
    let pop = random_population(11, &[33]);
    for (which, splitter) in all_splitters().into_iter().enumerate() {
        for vsp in 0..splitter.num_virtual_subpops() {
            let counted = (0..33)
                .filter(|&i| splitter.contains(&pop, i, VspId::new(0, vsp)).unwrap())
                .count();
            assert_eq!(
                splitter.size(&pop, 0, vsp).unwrap(),
                counted,
                "splitter {which}, vsp {vsp}"
            );
        }
    }
}

#[test]
fn partitioning_splitters_cover_sub_pop_exactly() {
    let pop = random_population(13, &[50]);
    // Sex, affection, proportion, and covering-range splitters partition the
    // subpopulation; info and genotype splitters need not.
    let partitioning: Vec<Box<dyn Splitter>> = vec![
        Box::new(SexSplitter::new()),
        Box::new(AffectionSplitter::new()),
        Box::new(ProportionSplitter::new(vec![0.2, 0.5, 0.3]).unwrap()),
        Box::new(RangeSplitter::new(vec![[0, 15], [15, 50]]).unwrap()),
    ];
    for (which, splitter) in partitioning.into_iter().enumerate() {
        let total: usize = (0..splitter.num_virtual_subpops())
            .map(|v| splitter.size(&pop, 0, v).unwrap())
            .sum();
        assert_eq!(total, 50, "splitter {which}");
    }
}

#[test]
fn overlapping_splitters_may_exceed_sub_pop_size() {
    let pop = random_population(17, &[30]);
    let splitter = InfoSplitter::by_ranges("age", vec![[0.0, 60.0], [30.0, 90.0]]).unwrap();
    let total: usize = (0..2).map(|v| splitter.size(&pop, 0, v).unwrap()).sum();
    assert!(total >= 30);
}

#[test]
fn combined_with_no_unions_flattens_child_indices() {
    let pop = random_population(19, &[24]);
    let children: Vec<Box<dyn Splitter>> = vec![
        Box::new(SexSplitter::new()),
        Box::new(InfoSplitter::by_cutoffs("age", vec![40.0]).unwrap()),
        Box::new(AffectionSplitter::new()),
    ];
    let counts: Vec<usize> = children.iter().map(|c| c.num_virtual_subpops()).collect();
    let combined = CombinedSplitter::new(children.clone()).unwrap();
    assert_eq!(
        combined.num_virtual_subpops(),
        counts.iter().sum::<usize>()
    );
    // Every flattened VSP agrees with its owning child at the child-local
    // index.
    let mut flat = 0;
    for (child, count) in counts.iter().enumerate() {
        for local in 0..*count {
            for i in 0..24 {
                assert_eq!(
                    combined.contains(&pop, i, VspId::new(0, flat)).unwrap(),
                    children[child].contains(&pop, i, VspId::new(0, local)).unwrap(),
                    "flat {flat} vs child {child}:{local}"
                );
            }
            assert_eq!(combined.name(flat).unwrap(), children[child].name(local).unwrap());
            flat += 1;
        }
    }
}

#[test]
fn product_decomposition_is_most_significant_first() {
    let pop = random_population(23, &[20]);
    let sex = SexSplitter::new();
    let info = InfoSplitter::by_cutoffs("age", vec![30.0, 60.0]).unwrap();
    let product = ProductSplitter::new(vec![
        Box::new(SexSplitter::new()),
        Box::new(InfoSplitter::by_cutoffs("age", vec![30.0, 60.0]).unwrap()),
    ])
    .unwrap();
    // Child VSP counts [2, 3]: six VSPs, and flattened index 4 decomposes to
    // child-local indices (1, 1).
    assert_eq!(product.num_virtual_subpops(), 6);
    for i in 0..20 {
        let expected = sex.contains(&pop, i, VspId::new(0, 1)).unwrap()
            && info.contains(&pop, i, VspId::new(0, 1)).unwrap();
        assert_eq!(
            product.contains(&pop, i, VspId::new(0, 4)).unwrap(),
            expected,
            "individual {i}"
        );
    }
}

#[test]
fn driver_loop_over_vsp_selection() {
    let mut pop = random_population(29, &[20, 20]);
    let mut splitter = SexSplitter::new();
    let selection: VspList = (0..2).map(|sp| VspId::new(sp, 0)).collect();

    // Score only males, in every subpopulation. The selector is scoped to
    // the activated subpopulation so untouched subpopulations (still fully
    // visible) are not scored early.
    let base = MultiAlleleSelector::new(vec![0], vec![1.0, 0.9, 0.5]).unwrap();
    for id in selection.expand(&pop) {
        let sub_pop = id.sub_pop().unwrap();
        let vsp = id.virtual_sub_pop().unwrap();
        splitter.activate(&mut pop, sub_pop, vsp).unwrap();
        let selector = base.clone().with_sub_pops(vec![sub_pop]);
        selector.apply(&mut pop).unwrap();
        splitter.deactivate(&mut pop, sub_pop).unwrap();
    }

    for sp in 0..2 {
        for i in 0..20 {
            let ind = pop.individual(sp, i).unwrap();
            if ind.sex() == Sex::Male {
                assert!(ind.info(DEFAULT_FITNESS_FIELD).is_ok());
            } else {
                assert!(ind.info(DEFAULT_FITNESS_FIELD).is_err());
            }
        }
    }
}

#[test]
fn all_avail_selection_expands_per_population() {
    let selection = VspList::all();
    let small = random_population(31, &[5]);
    let large = random_population(31, &[5, 5, 5]);
    assert_eq!(selection.expand(&small).len(), 1);
    assert_eq!(selection.expand(&large).len(), 3);
}

#[test]
fn cloned_configuration_keeps_activation_independent() {
    let mut pop_a = random_population(37, &[16]);
    let mut pop_b = pop_a.clone();
    let mut original = ProductSplitter::new(vec![
        Box::new(SexSplitter::new()),
        Box::new(AffectionSplitter::new()),
    ])
    .unwrap();
    let mut clone = original.clone_box();

    original.activate(&mut pop_a, 0, 0).unwrap();
    clone.activate(&mut pop_b, 0, 3).unwrap();
    assert_eq!(original.activated_sub_pop(), Some(0));
    assert_eq!(clone.activated_sub_pop(), Some(0));

    original.deactivate(&mut pop_a, 0).unwrap();
    // The clone's activation survives the original's deactivation.
    assert_eq!(clone.activated_sub_pop(), Some(0));
    clone.deactivate(&mut pop_b, 0).unwrap();
}

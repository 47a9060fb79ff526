//! Integration tests for the web model and the word-path generator
//!
//! These cover the grid query contracts, offline generation invariants and
//! online layout validation.

fn layout(
    rows: usize,
    cols: usize,
    cells: &[(usize, usize, &str, u32)],
    category: &str,
) -> weaver_core::LayoutPayload {
    let mut words = vec![vec![String::new(); cols]; rows];
    let mut scores = vec![vec![0u32; cols]; rows];
    for &(r, c, word, score) in cells {
        words[r][c] = word.to_string();
        scores[r][c] = score;
    }
    weaver_core::LayoutPayload {
        rows,
        cols,
        words,
        scores,
        category: category.to_string(),
    }
}

#[cfg(test)]
mod grid_tests {
    use weaver_core::error::GridError;
    use weaver_core::grid::web_from_layout;
    use weaver_core::{Cell, Direction};

    use crate::layout;

    fn sample_web() -> weaver_core::SpiderWeb {
        let payload = layout(
            5,
            5,
            &[(2, 2, "CAT", 10), (2, 3, "DOG", 15), (2, 4, "END", 0)],
            "Animals",
        );
        web_from_layout(&payload).expect("sample layout is valid")
    }

    #[test]
    fn test_word_at_returns_cell_contents() {
        let web = sample_web();
        assert_eq!(web.word_at(2, 2).unwrap(), Some("CAT"));
        assert_eq!(web.word_at(2, 3).unwrap(), Some("DOG"));
        assert_eq!(web.word_at(0, 0).unwrap(), None);
    }

    #[test]
    fn test_word_at_out_of_bounds() {
        let web = sample_web();
        assert_eq!(
            web.word_at(5, 0),
            Err(GridError::OutOfBounds {
                row: 5,
                col: 0,
                rows: 5,
                cols: 5
            })
        );
        assert!(web.word_at(0, 5).is_err());
    }

    #[test]
    fn test_score_at_out_of_bounds() {
        let web = sample_web();
        assert_eq!(web.score_at(2, 2).unwrap(), 10);
        assert!(web.score_at(9, 9).is_err());
    }

    #[test]
    fn test_clear_word_is_idempotent() {
        let mut web = sample_web();
        web.clear_word(2, 2).unwrap();
        assert_eq!(web.word_at(2, 2).unwrap(), None);

        // Clearing again is a no-op, not an error
        web.clear_word(2, 2).unwrap();
        assert_eq!(web.word_at(2, 2).unwrap(), None);
    }

    #[test]
    fn test_clear_word_out_of_bounds() {
        let mut web = sample_web();
        assert!(web.clear_word(7, 7).is_err());
    }

    #[test]
    fn test_is_on_path_matches_membership() {
        let web = sample_web();
        let path: Vec<Cell> = web.path().to_vec();
        for r in 0..web.rows() {
            for c in 0..web.cols() {
                assert_eq!(
                    web.is_on_path(r, c),
                    path.contains(&Cell::new(r, c)),
                    "membership mismatch at ({}, {})",
                    r,
                    c
                );
            }
        }
    }

    #[test]
    fn test_mid_is_grid_center() {
        let web = sample_web();
        assert_eq!(web.mid(), Cell::new(2, 2));
        assert_eq!(web.player(), web.mid());
    }

    #[test]
    fn test_target_from_respects_edges() {
        let web = sample_web();
        let corner = Cell::new(0, 0);
        assert_eq!(web.target_from(corner, Direction::Up), None);
        assert_eq!(web.target_from(corner, Direction::Left), None);
        assert_eq!(
            web.target_from(corner, Direction::Down),
            Some(Cell::new(1, 0))
        );
        assert_eq!(
            web.target_from(corner, Direction::Right),
            Some(Cell::new(0, 1))
        );

        let far = Cell::new(4, 4);
        assert_eq!(web.target_from(far, Direction::Down), None);
        assert_eq!(web.target_from(far, Direction::Right), None);
    }

    #[test]
    fn test_remaining_words_counts_uncollected() {
        let mut web = sample_web();
        assert_eq!(web.remaining_words(), 2);
        web.clear_word(2, 3).unwrap();
        assert_eq!(web.remaining_words(), 1);
    }
}

#[cfg(test)]
mod generator_tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use weaver_core::config::GameConfig;
    use weaver_core::grid::generate_offline;
    use weaver_core::{Cell, Vocabulary, END_WORD};

    #[test]
    fn test_generated_webs_satisfy_invariants() {
        let vocabulary = Vocabulary::builtin();
        let config = GameConfig::default();

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let web = generate_offline(&vocabulary, &config, &mut rng);

            // Offline dimensions come from the configured set
            assert!(config.dimensions.contains(&web.rows()), "seed {}", seed);
            assert_eq!(web.rows(), web.cols());

            let path = web.path();
            assert!(path.len() >= 2, "seed {}: path too short", seed);
            assert!(path.len() <= config.max_words + 1);

            // The walk starts at the grid center
            assert_eq!(path[0], web.mid());

            // Adjacent steps, no revisits
            for pair in path.windows(2) {
                let dr = pair[0].row.abs_diff(pair[1].row);
                let dc = pair[0].col.abs_diff(pair[1].col);
                assert_eq!(dr + dc, 1, "seed {}: non-adjacent step", seed);
            }
            let mut seen = path.to_vec();
            seen.sort_by_key(|c| (c.row, c.col));
            seen.dedup();
            assert_eq!(seen.len(), path.len(), "seed {}: revisited cell", seed);

            // Every non-END path cell carries a word and a positive score;
            // the END cell is unique and last
            for (i, cell) in path.iter().enumerate() {
                let word = web.word_at(cell.row, cell.col).unwrap();
                if i == path.len() - 1 {
                    assert_eq!(word, Some(END_WORD));
                } else {
                    let word = word.expect("path cell has a word");
                    assert_ne!(word, END_WORD);
                    assert!(web.score_at(cell.row, cell.col).unwrap() > 0);
                }
            }

            // Off-path cells are empty and score zero
            for r in 0..web.rows() {
                for c in 0..web.cols() {
                    if !web.is_on_path(r, c) {
                        assert_eq!(web.word_at(r, c).unwrap(), None);
                        assert_eq!(web.score_at(r, c).unwrap(), 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_generator_respects_configured_dimensions() {
        let vocabulary = Vocabulary::builtin();
        let config = GameConfig {
            dimensions: vec![5],
            ..GameConfig::default()
        };
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let web = generate_offline(&vocabulary, &config, &mut rng);
            assert_eq!(web.rows(), 5);
            assert_eq!(web.cols(), 5);
        }
    }

    #[test]
    fn test_generator_category_comes_from_vocabulary() {
        let vocabulary = Vocabulary::builtin();
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let web = generate_offline(&vocabulary, &config, &mut rng);
        assert!(vocabulary
            .categories()
            .iter()
            .any(|c| c.name == web.category()));
    }

    #[test]
    fn test_mid_cell_for_both_dimensions() {
        let vocabulary = Vocabulary::builtin();
        for dimension in [5usize, 6] {
            let config = GameConfig {
                dimensions: vec![dimension],
                ..GameConfig::default()
            };
            let mut rng = StdRng::seed_from_u64(1);
            let web = generate_offline(&vocabulary, &config, &mut rng);
            assert_eq!(web.mid(), Cell::new(dimension / 2, dimension / 2));
        }
    }
}

#[cfg(test)]
mod layout_validation_tests {
    use weaver_core::error::LayoutError;
    use weaver_core::grid::web_from_layout;
    use weaver_core::Cell;

    use crate::layout;

    #[test]
    fn test_valid_layout_reconstructs_path_order() {
        let payload = layout(
            5,
            5,
            &[
                (2, 2, "CAT", 10),
                (2, 3, "DOG", 15),
                (3, 3, "FOX", 15),
                (3, 4, "END", 0),
            ],
            "Animals",
        );
        let web = web_from_layout(&payload).unwrap();
        assert_eq!(
            web.path(),
            &[
                Cell::new(2, 2),
                Cell::new(2, 3),
                Cell::new(3, 3),
                Cell::new(3, 4),
            ]
        );
        assert_eq!(web.end_cell(), Cell::new(3, 4));
        assert_eq!(web.category(), "Animals");
    }

    #[test]
    fn test_word_matrix_dimension_mismatch() {
        let mut payload = layout(5, 5, &[(2, 2, "END", 0)], "Animals");
        payload.words.pop();
        assert!(matches!(
            web_from_layout(&payload),
            Err(LayoutError::DimensionMismatch { matrix: "word", .. })
        ));
    }

    #[test]
    fn test_score_matrix_dimension_mismatch() {
        let mut payload = layout(5, 5, &[(2, 2, "END", 0)], "Animals");
        payload.scores[1].push(3);
        assert!(matches!(
            web_from_layout(&payload),
            Err(LayoutError::DimensionMismatch { matrix: "score", .. })
        ));
    }

    #[test]
    fn test_missing_end_rejected() {
        let payload = layout(5, 5, &[(2, 2, "CAT", 10), (2, 3, "DOG", 15)], "Animals");
        assert_eq!(web_from_layout(&payload), Err(LayoutError::MissingEnd));
    }

    #[test]
    fn test_duplicate_end_rejected() {
        let payload = layout(
            5,
            5,
            &[(2, 2, "END", 0), (2, 3, "CAT", 10), (2, 4, "END", 0)],
            "Animals",
        );
        assert_eq!(web_from_layout(&payload), Err(LayoutError::DuplicateEnd(2)));
    }

    #[test]
    fn test_disconnected_path_rejected() {
        let payload = layout(
            5,
            5,
            &[(0, 0, "CAT", 10), (0, 1, "END", 0), (4, 4, "DOG", 15)],
            "Animals",
        );
        assert_eq!(web_from_layout(&payload), Err(LayoutError::BrokenPath));
    }

    #[test]
    fn test_branching_path_rejected() {
        // T shape: (1,1) has three word neighbors
        let payload = layout(
            5,
            5,
            &[
                (0, 1, "CAT", 10),
                (1, 0, "DOG", 15),
                (1, 1, "FOX", 15),
                (1, 2, "OWL", 15),
                (2, 1, "END", 0),
            ],
            "Animals",
        );
        assert_eq!(web_from_layout(&payload), Err(LayoutError::BrokenPath));
    }

    #[test]
    fn test_end_in_path_interior_rejected() {
        let payload = layout(
            5,
            5,
            &[(2, 2, "CAT", 10), (2, 3, "END", 0), (2, 4, "DOG", 15)],
            "Animals",
        );
        assert_eq!(web_from_layout(&payload), Err(LayoutError::BrokenPath));
    }

    #[test]
    fn test_lone_end_cell_is_valid() {
        let payload = layout(5, 5, &[(1, 1, "END", 0)], "Animals");
        let web = web_from_layout(&payload).unwrap();
        assert_eq!(web.path(), &[Cell::new(1, 1)]);
    }

    #[test]
    fn test_cycle_rejected() {
        let payload = layout(
            5,
            5,
            &[
                (0, 0, "CAT", 10),
                (0, 1, "DOG", 15),
                (1, 1, "END", 0),
                (1, 0, "FOX", 15),
            ],
            "Animals",
        );
        assert_eq!(web_from_layout(&payload), Err(LayoutError::BrokenPath));
    }
}

#[cfg(test)]
mod vocabulary_tests {
    use weaver_core::grid::Category;
    use weaver_core::{Vocabulary, END_WORD};

    #[test]
    fn test_builtin_vocabulary_has_no_reserved_words() {
        let vocabulary = Vocabulary::builtin();
        assert!(!vocabulary.categories().is_empty());
        for category in vocabulary.categories() {
            assert!(!category.words.is_empty());
            for word in &category.words {
                assert!(!word.is_empty());
                assert_ne!(word, END_WORD);
            }
        }
    }

    #[test]
    fn test_category_drops_reserved_words() {
        let category = Category::new(
            "Test",
            vec!["CAT".to_string(), END_WORD.to_string(), String::new()],
        )
        .unwrap();
        assert_eq!(category.words, vec!["CAT".to_string()]);
    }

    #[test]
    fn test_category_with_only_reserved_words_is_none() {
        assert!(Category::new("Test", vec![END_WORD.to_string()]).is_none());
        assert!(Vocabulary::new(Vec::new()).is_none());
    }
}

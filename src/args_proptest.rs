//! Property-based tests for argument assembly.
//!
//! These tests use proptest to generate random argument lists and verify that
//! tokenization invariants hold for all inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::args::build_args;
    use proptest::prelude::*;

    proptest! {
        /// Property: without a path, no produced token is empty or contains whitespace
        #[test]
        fn build_args_tokens_are_atomic(
            input in prop::collection::vec("[ a-z\\-\t]{0,12}", 0..6),
        ) {
            let result = build_args(&input, "");
            for token in &result {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.contains(char::is_whitespace), "token {:?}", token);
            }
        }

        /// Property: re-splitting the joined input yields the same tokens in order
        #[test]
        fn build_args_preserves_token_order(
            input in prop::collection::vec("[ a-z\\-=]{0,12}", 0..6),
            path in "[a-z/]{0,8}",
        ) {
            let result = build_args(&input, &path);

            let mut expected: Vec<String> = input
                .join(" ")
                .split_whitespace()
                .map(str::to_string)
                .collect();
            if !path.is_empty() {
                expected.push(path.clone());
            }

            prop_assert_eq!(result, expected);
        }

        /// Property: splitting an argument up front does not change the result
        #[test]
        fn build_args_presplit_is_equivalent(
            input in prop::collection::vec("[ a-z\\-]{0,12}", 0..6),
            path in "[a-z ]{0,8}",
        ) {
            let presplit: Vec<String> = input
                .iter()
                .flat_map(|arg| arg.split_whitespace())
                .map(str::to_string)
                .collect();

            prop_assert_eq!(build_args(&input, &path), build_args(&presplit, &path));
        }

        /// Property: a non-empty path is always the last token, unsplit
        #[test]
        fn build_args_path_is_last(
            input in prop::collection::vec("[ a-z\\-]{0,12}", 0..6),
            path in "[a-z ]{1,8}",
        ) {
            let result = build_args(&input, &path);
            prop_assert_eq!(result.last(), Some(&path));
        }
    }
}

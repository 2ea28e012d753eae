//! Pagination arguments for list commands.
//!
//! The upstream API returns whole collections, so `--limit` and `--offset`
//! slice client-side. Zero means "not set" for both, which keeps the flags
//! out of the JSON envelope unless the user typed them.
//!
//! ```bash
//! deputy employees list --limit 10 --offset 20
//! deputy rosters list --fail-empty --output json
//! ```

use clap::Args;

/// Flags shared by every `list` subcommand.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Maximum number of items to return (0 = all)
    #[arg(long, value_name = "COUNT", default_value_t = 0, display_order = 50)]
    pub limit: usize,

    /// Number of items to skip before returning
    #[arg(long, value_name = "COUNT", default_value_t = 0, display_order = 51)]
    pub offset: usize,

    /// Exit with code 4 when nothing matches (JSON output only)
    #[arg(long, display_order = 52)]
    pub fail_empty: bool,
}

impl ListArgs {
    /// The limit, if one was requested.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        if self.limit == 0 { None } else { Some(self.limit) }
    }

    /// The offset, if one was requested.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        if self.offset == 0 { None } else { Some(self.offset) }
    }

    /// Slice `items` by these arguments.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        apply_pagination(items, self.offset, self.limit)
    }
}

/// Skip `offset` items, then keep at most `limit`. Zero disables either step.
#[must_use]
pub fn apply_pagination<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    let iter = items.into_iter().skip(offset);
    if limit == 0 {
        iter.collect()
    } else {
        iter.take(limit).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        list: ListArgs,
    }

    fn one_to_ten() -> Vec<u32> {
        (1..=10).collect()
    }

    mod slicing {
        use super::*;

        #[test]
        fn test_offset_near_end_keeps_remainder() {
            assert_eq!(apply_pagination(one_to_ten(), 8, 10), vec![9, 10]);
        }

        #[test]
        fn test_offset_past_end_is_empty() {
            assert!(apply_pagination(one_to_ten(), 15, 0).is_empty());
        }

        #[test]
        fn test_zero_zero_is_unchanged() {
            assert_eq!(apply_pagination(one_to_ten(), 0, 0), one_to_ten());
        }

        #[test]
        fn test_limit_only() {
            assert_eq!(apply_pagination(one_to_ten(), 0, 3), vec![1, 2, 3]);
        }

        #[test]
        fn test_empty_input() {
            assert!(apply_pagination(Vec::<u32>::new(), 2, 2).is_empty());
        }
    }

    mod flags {
        use super::*;

        #[test]
        fn test_defaults_are_unset() {
            let args = Harness::try_parse_from(["t"]).unwrap().list;
            assert_eq!(args, ListArgs::default());
            assert_eq!(args.limit(), None);
            assert_eq!(args.offset(), None);
            assert!(!args.fail_empty);
        }

        #[test]
        fn test_parses_all_flags() {
            let args = Harness::try_parse_from(["t", "--limit", "5", "--offset", "2", "--fail-empty"])
                .unwrap()
                .list;
            assert_eq!(args.limit(), Some(5));
            assert_eq!(args.offset(), Some(2));
            assert!(args.fail_empty);
            assert_eq!(args.apply(one_to_ten()), vec![3, 4, 5, 6, 7]);
        }

        #[test]
        fn test_explicit_zero_is_unset() {
            let args = Harness::try_parse_from(["t", "--limit", "0"]).unwrap().list;
            assert_eq!(args.limit(), None);
        }

        #[test]
        fn test_negative_is_rejected() {
            assert!(Harness::try_parse_from(["t", "--limit", "-1"]).is_err());
        }
    }
}

//! Comprehensive unit tests for the document numbering module
//!
//! Tests cover formatting, parsing, ordering, and concurrent
//! sequence allocation.

use core_kernel::{DocumentKind, DocumentNumber, NumberError, SequenceAllocator};

mod formatting {
    use super::*;

    #[test]
    fn test_invoice_number_format() {
        let number = DocumentNumber::new(DocumentKind::Invoice, 2025, 1).unwrap();
        assert_eq!(number.to_string(), "INV-2025-00001");
    }

    #[test]
    fn test_payment_number_format() {
        let number = DocumentNumber::new(DocumentKind::Payment, 2024, 305).unwrap();
        assert_eq!(number.to_string(), "PAY-2024-00305");
    }

    #[test]
    fn test_claim_number_format() {
        let number = DocumentNumber::new(DocumentKind::Claim, 2025, 12).unwrap();
        assert_eq!(number.to_string(), "CLM-2025-00012");
    }

    #[test]
    fn test_padding_is_exactly_five_digits() {
        let number = DocumentNumber::new(DocumentKind::Invoice, 2025, 99999).unwrap();
        assert_eq!(number.to_string(), "INV-2025-99999");
    }

    #[test]
    fn test_sequence_overflows_padding_gracefully() {
        let number = DocumentNumber::new(DocumentKind::Invoice, 2025, 100_000).unwrap();
        assert_eq!(number.to_string(), "INV-2025-100000");
    }

    #[test]
    fn test_kind_prefixes() {
        assert_eq!(DocumentKind::Invoice.prefix(), "INV");
        assert_eq!(DocumentKind::Payment.prefix(), "PAY");
        assert_eq!(DocumentKind::Claim.prefix(), "CLM");
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_valid_number() {
        let number: DocumentNumber = "INV-2025-00031".parse().unwrap();
        assert_eq!(number.kind(), DocumentKind::Invoice);
        assert_eq!(number.year(), 2025);
        assert_eq!(number.sequence(), 31);
    }

    #[test]
    fn test_parse_preserves_format_bit_for_bit() {
        for raw in ["INV-2025-00001", "PAY-2024-01234", "CLM-2023-99999", "INV-2025-123456"] {
            let parsed: DocumentNumber = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
    }

    #[test]
    fn test_parse_unknown_prefix() {
        let result = "DOC-2025-00001".parse::<DocumentNumber>();
        assert_eq!(
            result,
            Err(NumberError::UnknownPrefix("DOC".to_string()))
        );
    }

    #[test]
    fn test_parse_two_digit_year_rejected() {
        assert!(matches!(
            "INV-25-00001".parse::<DocumentNumber>(),
            Err(NumberError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_short_sequence_rejected() {
        assert!(matches!(
            "INV-2025-001".parse::<DocumentNumber>(),
            Err(NumberError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_zero_sequence_rejected() {
        assert_eq!(
            "INV-2025-00000".parse::<DocumentNumber>(),
            Err(NumberError::InvalidSequence)
        );
    }

    #[test]
    fn test_parse_missing_segments_rejected() {
        for raw in ["", "INV", "INV-2025", "2025-00001"] {
            assert!(raw.parse::<DocumentNumber>().is_err(), "{raw:?} should fail");
        }
    }

    #[test]
    fn test_parse_non_numeric_segments_rejected() {
        assert!("INV-YYYY-00001".parse::<DocumentNumber>().is_err());
        assert!("INV-2025-NNNNN".parse::<DocumentNumber>().is_err());
    }
}

mod ordering {
    use super::*;

    #[test]
    fn test_numbers_order_by_year_then_sequence() {
        let old: DocumentNumber = "INV-2024-99999".parse().unwrap();
        let new_year: DocumentNumber = "INV-2025-00001".parse().unwrap();
        let later: DocumentNumber = "INV-2025-00100".parse().unwrap();

        assert!(old < new_year);
        assert!(new_year < later);
    }
}

mod allocation {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequences_start_at_one() {
        let allocator = SequenceAllocator::new();
        let first = allocator.allocate(DocumentKind::Invoice, 2025).unwrap();
        assert_eq!(first.sequence(), 1);
    }

    #[test]
    fn test_sequences_are_independent_per_kind() {
        let allocator = SequenceAllocator::new();
        allocator.allocate(DocumentKind::Invoice, 2025).unwrap();
        allocator.allocate(DocumentKind::Invoice, 2025).unwrap();

        let payment = allocator.allocate(DocumentKind::Payment, 2025).unwrap();
        assert_eq!(payment.sequence(), 1);
    }

    #[test]
    fn test_sequences_reset_across_years() {
        let allocator = SequenceAllocator::new();
        for _ in 0..5 {
            allocator.allocate(DocumentKind::Claim, 2024).unwrap();
        }

        let new_year = allocator.allocate(DocumentKind::Claim, 2025).unwrap();
        assert_eq!(new_year.to_string(), "CLM-2025-00001");
        assert_eq!(allocator.current(DocumentKind::Claim, 2024), 5);
    }

    #[test]
    fn test_resume_from_imported_numbers() {
        let allocator = SequenceAllocator::new();
        allocator.resume_from(&"INV-2025-00044".parse().unwrap());

        let next = allocator.allocate(DocumentKind::Invoice, 2025).unwrap();
        assert_eq!(next.to_string(), "INV-2025-00045");
    }

    #[test]
    fn test_concurrent_allocation_never_duplicates() {
        let allocator = Arc::new(SequenceAllocator::new());
        let threads = 16;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| allocator.allocate(DocumentKind::Invoice, 2025).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().unwrap() {
                assert!(
                    seen.insert(number.sequence()),
                    "sequence {} issued twice",
                    number.sequence()
                );
            }
        }

        assert_eq!(seen.len(), threads * per_thread);
        assert_eq!(
            allocator.current(DocumentKind::Invoice, 2025) as usize,
            threads * per_thread
        );
    }
}

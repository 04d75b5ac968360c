use std::io::{Read, Write};

use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;

use mock_open::{open, Error, MockOpen, OpenMode};

/// Generate a limited-size byte vector to keep cases fast
fn arbitrary_bytes_limited(g: &mut Gen, max_size: usize) -> Vec<u8> {
    let size = usize::arbitrary(g) % max_size.min(g.size()).max(1);
    (0..size).map(|_| u8::arbitrary(g)).collect()
}

/// Expected contents plus sorted cut points splitting them into write calls
#[derive(Debug, Clone)]
struct ChunkedWrite {
    contents: Vec<u8>,
    cuts: Vec<usize>,
}

impl Arbitrary for ChunkedWrite {
    fn arbitrary(g: &mut Gen) -> Self {
        let contents = arbitrary_bytes_limited(g, 256);
        let mut cuts: Vec<usize> = (0..usize::arbitrary(g) % 8)
            .map(|_| usize::arbitrary(g) % (contents.len() + 1))
            .collect();
        cuts.sort_unstable();
        Self { contents, cuts }
    }
}

fn chunks(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut bounds = vec![0];
    bounds.extend_from_slice(cuts);
    bounds.push(data.len());
    bounds
        .windows(2)
        .map(|pair| data[pair[0]..pair[1]].to_vec())
        .collect()
}

#[quickcheck]
fn read_returns_exactly_the_seeded_contents(contents: Vec<u8>) -> bool {
    let expected = contents.clone();
    let mut read_back = Vec::new();
    let result = MockOpen::new("prop_file").contents(contents).run(|| {
        let mut file = open("prop_file", OpenMode::Read)?;
        file.read_to_end(&mut read_back)?;
        Ok(())
    });
    result.is_ok() && read_back == expected
}

#[quickcheck]
fn any_chunking_of_the_expected_contents_is_accepted(case: ChunkedWrite) -> bool {
    let ChunkedWrite { contents, cuts } = case;
    let pieces = chunks(&contents, &cuts);
    MockOpen::new("prop_file")
        .contents(contents)
        .mode(OpenMode::Write)
        .run(|| {
            let mut file = open("prop_file", OpenMode::Write)?;
            for piece in &pieces {
                file.write_all(piece)?;
            }
            file.close()?;
            Ok(())
        })
        .is_ok()
}

#[quickcheck]
fn any_corrupted_write_is_rejected(contents: Vec<u8>, flip_at: usize) -> TestResult {
    if contents.is_empty() {
        return TestResult::discard();
    }
    let mut corrupted = contents.clone();
    let idx = flip_at % corrupted.len();
    corrupted[idx] ^= 0xff;

    let result = MockOpen::new("prop_file")
        .contents(contents)
        .mode(OpenMode::Write)
        .run(|| {
            let mut file = open("prop_file", OpenMode::Write)?;
            file.write_all(&corrupted)?;
            file.close()?;
            Ok(())
        });
    TestResult::from_bool(matches!(result, Err(Error::ContentMismatch { .. })))
}

#[quickcheck]
fn any_truncated_write_is_rejected_at_close(contents: Vec<u8>, keep: usize) -> TestResult {
    if contents.is_empty() {
        return TestResult::discard();
    }
    let keep = keep % contents.len();
    let tail = contents[keep..].to_vec();

    let result = MockOpen::new("prop_file")
        .contents(contents.clone())
        .mode(OpenMode::Write)
        .run(|| {
            let mut file = open("prop_file", OpenMode::Write)?;
            file.write_all(&contents[..keep])?;
            file.close()?;
            Ok(())
        });
    TestResult::from_bool(matches!(
        result,
        Err(Error::IncompleteWrite { ref remaining, .. }) if *remaining == tail
    ))
}

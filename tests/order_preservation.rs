use std::io::Cursor;

use parzst::{compress_stream, Config};
use zstd::zstd_safe;

/// Split a multi-frame stream into its individual frames.
fn frames(mut data: &[u8]) -> Vec<&[u8]> {
    let mut out = Vec::new();
    while !data.is_empty() {
        let len = zstd_safe::find_frame_compressed_size(data).expect("malformed frame");
        out.push(&data[..len]);
        data = &data[len..];
    }
    out
}

#[test]
fn frames_follow_input_order_across_waves() {
    let chunk_size = 1024;
    let chunks = 23usize;
    // Chunk k is filled with byte k so any reordering is visible.
    let input: Vec<u8> = (0..chunks)
        .flat_map(|k| std::iter::repeat(k as u8).take(chunk_size))
        .collect();
    let config = Config {
        level: 3,
        workers: 4,
        chunk_size,
    };

    let (out, stats) = compress_stream(Cursor::new(input.clone()), Vec::new(), &config).unwrap();
    assert_eq!(stats.waves, 6);

    let frames = frames(&out);
    assert_eq!(frames.len(), chunks);
    for (k, frame) in frames.iter().enumerate() {
        let payload = zstd::decode_all(*frame).unwrap();
        assert_eq!(payload, vec![k as u8; chunk_size], "frame {k} out of place");
    }
    assert_eq!(zstd::decode_all(&out[..]).unwrap(), input);
}

#[test]
fn uneven_chunk_costs_do_not_reorder_output() {
    use rand::{RngCore, SeedableRng};

    // Alternate random and constant chunks so workers finish at different
    // times within a wave.
    let chunk_size = 8 * 1024;
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let mut input = Vec::new();
    for k in 0..16 {
        let mut block = vec![k as u8; chunk_size];
        if k % 2 == 0 {
            rng.fill_bytes(&mut block);
        }
        input.extend_from_slice(&block);
    }
    input.extend_from_slice(b"tail");
    let config = Config {
        level: 9,
        workers: 8,
        chunk_size,
    };

    let (out, stats) = compress_stream(Cursor::new(input.clone()), Vec::new(), &config).unwrap();
    assert_eq!(stats.chunks, 17);
    assert_eq!(stats.finalized_by, Some(16));
    assert_eq!(zstd::decode_all(&out[..]).unwrap(), input);
}

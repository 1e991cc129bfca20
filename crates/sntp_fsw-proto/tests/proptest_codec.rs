use proptest::prelude::*;
use sntp_proto::protocol::{Mode, PACKET_SIZE, Packet, Stratum};
use sntp_proto::status::Status;
use sntp_proto::timestamp::{
    NtpDuration, Timestamp, clock_offset, fractions_to_millis, millis_to_fractions,
};
use sntp_proto::{deserialize_request, deserialize_response, serialize_request};

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (any::<u32>(), any::<u32>()).prop_map(|(seconds, fraction)| Timestamp::new(seconds, fraction))
}

proptest! {
    #[test]
    fn wire_round_trip(ts in arb_timestamp()) {
        prop_assert_eq!(Timestamp::decode_from_wire(ts.encode_for_wire()), ts);
    }

    #[test]
    fn millis_round_trip(ms in 0u32..1000) {
        prop_assert_eq!(fractions_to_millis(millis_to_fractions(ms)), ms);
    }

    #[test]
    fn fraction_never_reaches_a_second(fraction in any::<u32>()) {
        prop_assert!(fractions_to_millis(fraction) <= 999);
    }

    /// Short buffers are rejected without reading past their end.
    #[test]
    fn short_request_is_bad_parameter(len in 0usize..PACKET_SIZE) {
        let buf = vec![0xA5u8; len];
        prop_assert_eq!(deserialize_request(&buf), Err(Status::BadParameter));
    }

    #[test]
    fn arbitrary_48_bytes_always_parse(bytes in prop::collection::vec(any::<u8>(), PACKET_SIZE)) {
        let packet = deserialize_request(&bytes).unwrap();
        prop_assert_eq!(&packet.to_bytes()[..], &bytes[..]);
    }

    /// Any response whose origin differs from what was sent is rejected.
    #[test]
    fn forged_origin_rejected(sent in arb_timestamp(), forged in arb_timestamp()) {
        prop_assume!(sent != forged);
        let reply = Packet {
            mode: Mode::Server,
            stratum: Stratum::SECONDARY_MAX,
            origin_timestamp: forged,
            receive_timestamp: Timestamp::new(1, 0),
            transmit_timestamp: Timestamp::new(1, 1),
            ..Packet::default()
        };
        prop_assert_eq!(
            deserialize_response(sent, sent, &reply.to_bytes()),
            Err(Status::InvalidResponse)
        );
    }

    /// The value returned by serialize_request is exactly what went on the wire.
    #[test]
    fn serialized_transmit_matches_returned(ts in arb_timestamp(), correlator in any::<u32>()) {
        let mut buf = [0u8; PACKET_SIZE];
        let sent = serialize_request(ts, correlator, &mut buf).unwrap();
        prop_assert_eq!(sent.seconds, ts.seconds);
        prop_assert_eq!(sent.fraction >> 16, ts.fraction >> 16);
        prop_assert_eq!(deserialize_request(&buf).unwrap().transmit_timestamp, sent);
    }

    /// Seconds differences are era-aware for any base, including across the wrap.
    #[test]
    fn delta_is_era_aware(base in any::<u32>(), step in -1_000_000i32..1_000_000) {
        let earlier = Timestamp::new(base, 0);
        let later = Timestamp::new(base.wrapping_add_signed(step), 0);
        prop_assert_eq!(later.delta_since(earlier).as_millis(), i64::from(step) * 1000);
    }

    /// A symmetric path with a skewed server reports the skew as the offset.
    #[test]
    fn offset_recovers_injected_skew(
        base in any::<u32>(),
        skew_ms in -100_000i64..100_000,
        one_way_ms in 0i64..2_000,
        hold_ms in 0i64..50,
    ) {
        let t1 = Timestamp::new(base, 0);
        let one_way = NtpDuration::from_millis(one_way_ms);
        let skew = NtpDuration::from_millis(skew_ms);
        let t2 = t1.offset_by(one_way).offset_by(skew);
        let t3 = t2.offset_by(NtpDuration::from_millis(hold_ms));
        let t4 = t1
            .offset_by(NtpDuration::from_millis(2 * one_way_ms + hold_ms));
        let offset = clock_offset(t1, t2, t3, t4).as_millis();
        prop_assert!((offset - skew_ms).abs() <= 1, "offset {} skew {}", offset, skew_ms);
    }
}

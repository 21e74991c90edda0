use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wlan_scan::ie::{parse, ElementId, InformationElement};
use wlan_scan::security::{AuthModeSet, CipherSet, KeyMgmtSet, NegotiatedSecurityInfo, SecurityCapability};

fn build_beacon_ies(vendor_elements: usize, vendor_data_len: usize) -> Vec<u8> {
    let mut ies = InformationElement::new(ElementId::Ssid, b"bench-network".to_vec()).serialize();
    ies.extend(
        InformationElement::new(ElementId::SupportedRates, vec![0x82, 0x84, 0x8b, 0x96, 0x0c, 0x12, 0x18, 0x24])
            .serialize(),
    );
    ies.extend(InformationElement::new(ElementId::DsParams, vec![6]).serialize());

    let mut rsn = vec![0x01, 0x00, 0x00, 0x0f, 0xac, 0x04];
    rsn.extend_from_slice(&[0x01, 0x00, 0x00, 0x0f, 0xac, 0x04]);
    rsn.extend_from_slice(&[0x02, 0x00, 0x00, 0x0f, 0xac, 0x02, 0x00, 0x0f, 0xac, 0x08]);
    rsn.extend_from_slice(&[0x8c, 0x00]);
    ies.extend(InformationElement::new(ElementId::Rsn, rsn).serialize());
    ies.extend(InformationElement::new(ElementId::HtCapabilities, vec![0xef; 26]).serialize());
    ies.extend(InformationElement::new(ElementId::VhtCapabilities, vec![0x91; 12]).serialize());

    for i in 0..vendor_elements {
        let mut value = vec![0x00, 0x90, 0x4c, 0x04]; // OUI + type
        value.extend(std::iter::repeat_n(i as u8, vendor_data_len));
        ies.extend(InformationElement::new(ElementId::Vendor, value).serialize());
    }
    ies
}

fn bench_ie_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("ie_parse");
    let cases = [("small", 1usize, 8usize), ("medium", 6, 32), ("large", 16, 200)];

    for (name, count, value_len) in cases {
        let bytes = build_beacon_ies(count, value_len);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let parsed = parse(black_box(bytes.as_slice()));
                let _ = black_box(parsed);
            });
        });
    }

    group.finish();
}

fn bench_security_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("security_resolve");
    let neg = NegotiatedSecurityInfo {
        auth_mode_set: AuthModeSet::RSNA | AuthModeSet::SAE,
        key_mgmt_set: KeyMgmtSet::PSK | KeyMgmtSet::SAE | KeyMgmtSet::FT_SAE,
        ucast_cipher_set: CipherSet::AES_CCM | CipherSet::TKIP,
        mcast_cipher_set: CipherSet::TKIP,
    };
    group.bench_function("rsn_sae", |b| {
        b.iter(|| {
            let capability = SecurityCapability::resolve(black_box(&neg));
            let _ = black_box(capability);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_ie_parse, bench_security_resolve);
criterion_main!(benches);

//! Instruction identity.
//!
//! A `Code` names a mnemonic together with one operand form. Forms that only
//! differ in vector width get their own code, suffixed with the width.

macro_rules! codes {
    ( $( $variant:ident => $mnemonic:expr, )* ) => {
        /// Mnemonic plus operand form of a decoded instruction.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum Code {
            $( $variant, )*
        }

        impl Code {
            /// Lowercase mnemonic, as printed by disassemblers.
            pub fn mnemonic(&self) -> &'static str {
                match *self {
                    $( Code::$variant => $mnemonic, )*
                }
            }
        }
    };
}

codes! {
    Invalid => "(bad)",
    Bound => "bound",

    Vmovaps128 => "vmovaps",
    Vmovaps256 => "vmovaps",
    Vmovaps512 => "vmovaps",
    VmovapsStore128 => "vmovaps",
    VmovapsStore256 => "vmovaps",
    VmovapsStore512 => "vmovaps",
    Vmovhlps => "vmovhlps",
    Vmovlps => "vmovlps",
    Vmovhpd => "vmovhpd",
    Vcvtsi2ssR32 => "vcvtsi2ss",
    Vcvtsi2ssR64 => "vcvtsi2ss",
    Vcvtsi2sdR32 => "vcvtsi2sd",
    Vcvtsi2sdR64 => "vcvtsi2sd",
    Vmovntps128 => "vmovntps",
    Vmovntps256 => "vmovntps",
    Vmovntps512 => "vmovntps",
    Vcvttss2siR32 => "vcvttss2si",
    Vcvttss2siR64 => "vcvttss2si",
    Vcvtss2siR32 => "vcvtss2si",
    Vcvtss2siR64 => "vcvtss2si",
    Vucomiss => "vucomiss",
    Vsqrtps128 => "vsqrtps",
    Vsqrtps256 => "vsqrtps",
    Vsqrtps512 => "vsqrtps",
    Vaddps128 => "vaddps",
    Vaddps256 => "vaddps",
    Vaddps512 => "vaddps",
    Vaddpd128 => "vaddpd",
    Vaddpd256 => "vaddpd",
    Vaddpd512 => "vaddpd",
    VmovdXmmRm32 => "vmovd",
    VmovqXmmRm64 => "vmovq",
    VmovdRm32Xmm => "vmovd",
    VmovqRm64Xmm => "vmovq",
    VmovqXmmXmmm64 => "vmovq",
    VmovqXmmm64Xmm => "vmovq",
    VmovssXmmXmmXmm => "vmovss",
    VmovssM32Xmm => "vmovss",
    Vpshufd128 => "vpshufd",
    Vpshufd256 => "vpshufd",
    Vpshufd512 => "vpshufd",
    Vpcmpeqb128 => "vpcmpeqb",
    Vpcmpeqb256 => "vpcmpeqb",
    Vpcmpeqb512 => "vpcmpeqb",
    Vcmpps128 => "vcmpps",
    Vcmpps256 => "vcmpps",
    Vcmpps512 => "vcmpps",
    VpinsrwR32 => "vpinsrw",
    VpinsrwR64 => "vpinsrw",
    VpextrwR32 => "vpextrw",
    VpextrwR64 => "vpextrw",
    Vshufps128 => "vshufps",
    Vshufps256 => "vshufps",
    Vshufps512 => "vshufps",
    Vpandd128 => "vpandd",
    Vpandd256 => "vpandd",
    Vpandd512 => "vpandd",
    Vmovntdq128 => "vmovntdq",
    Vmovntdq256 => "vmovntdq",
    Vmovntdq512 => "vmovntdq",
    VpslldImm128 => "vpslld",
    VpslldImm256 => "vpslld",
    VpslldImm512 => "vpslld",

    Vcvtph2ps128 => "vcvtph2ps",
    Vcvtph2ps256 => "vcvtph2ps",
    Vcvtph2ps512 => "vcvtph2ps",
    Vbroadcastss128 => "vbroadcastss",
    Vbroadcastss256 => "vbroadcastss",
    Vbroadcastss512 => "vbroadcastss",
    Vbroadcastf32x4Ymm => "vbroadcastf32x4",
    Vbroadcastf32x4Zmm => "vbroadcastf32x4",
    Vpmovm2b128 => "vpmovm2b",
    Vpmovm2b256 => "vpmovm2b",
    Vpmovm2b512 => "vpmovm2b",
    Vpmovb2m128 => "vpmovb2m",
    Vpmovb2m256 => "vpmovb2m",
    Vpmovb2m512 => "vpmovb2m",
    Vmovntdqa128 => "vmovntdqa",
    Vmovntdqa256 => "vmovntdqa",
    Vmovntdqa512 => "vmovntdqa",
    Vpmovdb128 => "vpmovdb",
    Vpmovdb256 => "vpmovdb",
    Vpmovdb512 => "vpmovdb",
    Vp4dpwssd => "vp4dpwssd",
    Vp2intersectd128 => "vp2intersectd",
    Vp2intersectd256 => "vp2intersectd",
    Vp2intersectd512 => "vp2intersectd",
    Vpbroadcastb128 => "vpbroadcastb",
    Vpbroadcastb256 => "vpbroadcastb",
    Vpbroadcastb512 => "vpbroadcastb",
    Vpbroadcastd128 => "vpbroadcastd",
    Vpbroadcastd256 => "vpbroadcastd",
    Vpbroadcastd512 => "vpbroadcastd",
    Vpbroadcastq128 => "vpbroadcastq",
    Vpbroadcastq256 => "vpbroadcastq",
    Vpbroadcastq512 => "vpbroadcastq",
    Vgatherdps128 => "vgatherdps",
    Vgatherdps256 => "vgatherdps",
    Vgatherdps512 => "vgatherdps",
    Vgatherpf0dps => "vgatherpf0dps",
    Vscatterdps128 => "vscatterdps",
    Vscatterdps256 => "vscatterdps",
    Vscatterdps512 => "vscatterdps",
    Vaesenc128 => "vaesenc",
    Vaesenc256 => "vaesenc",
    Vaesenc512 => "vaesenc",

    Valignd128 => "valignd",
    Valignd256 => "valignd",
    Valignd512 => "valignd",
    Vrndscaleps128 => "vrndscaleps",
    Vrndscaleps256 => "vrndscaleps",
    Vrndscaleps512 => "vrndscaleps",
    Vrndscaless => "vrndscaless",
    VpextrbR32 => "vpextrb",
    VpextrbR64 => "vpextrb",
    Vpextrd => "vpextrd",
    Vpextrq => "vpextrq",
    Vinsertf32x4Ymm => "vinsertf32x4",
    Vinsertf32x4Zmm => "vinsertf32x4",
    Vextractf32x4Ymm => "vextractf32x4",
    Vextractf32x4Zmm => "vextractf32x4",
    Vcvtps2ph128 => "vcvtps2ph",
    Vcvtps2ph256 => "vcvtps2ph",
    Vcvtps2ph512 => "vcvtps2ph",
    Vpcmpud128 => "vpcmpud",
    Vpcmpud256 => "vpcmpud",
    Vpcmpud512 => "vpcmpud",
    Vpinsrd => "vpinsrd",
    Vpinsrq => "vpinsrq",
    Vpternlogd128 => "vpternlogd",
    Vpternlogd256 => "vpternlogd",
    Vpternlogd512 => "vpternlogd",
    Vpclmulqdq128 => "vpclmulqdq",
    Vpclmulqdq256 => "vpclmulqdq",
    Vpclmulqdq512 => "vpclmulqdq",
    Vfixupimmps128 => "vfixupimmps",
    Vfixupimmps256 => "vfixupimmps",
    Vfixupimmps512 => "vfixupimmps",
    Vfpclassps128 => "vfpclassps",
    Vfpclassps256 => "vfpclassps",
    Vfpclassps512 => "vfpclassps",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics() {
        assert_eq!(Code::Invalid.mnemonic(), "(bad)");
        assert_eq!(Code::Vaddps512.mnemonic(), "vaddps");
        assert_eq!(Code::VmovqRm64Xmm.mnemonic(), "vmovq");
        assert_eq!(Code::Vinsertf32x4Zmm.mnemonic(), "vinsertf32x4");
    }
}

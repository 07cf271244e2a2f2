//! EVEX opcode tables.
//!
//! Covers a cross-section of AVX-512 (foundation, VL, BW, DQ, plus a few
//! extensions like 4VNNIW, VP2INTERSECT and the prefetch group) picked so that
//! every operand shape is reachable from raw bytes.

use evex::code::Code;
use evex::handler::{Handler, LengthDispatch};
use evex::instr::TupleType::{
    Full32, Full64, FullMem, HalfMem, QuarterMem, Tuple1Fixed, Tuple1Scalar, Tuple1_4X, Tuple2, Tuple4,
};
use evex::register::RegClass::*;
use evex::shape::Rounding;
use evex::shapes::*;
use evex::state::VectorLength::*;

/// Opcode map selected by `EVEX.mm`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum OpcodeMap {
    Map0F = 1,
    Map0F38 = 2,
    Map0F3A = 3,
}

impl OpcodeMap {
    pub const ALL: [OpcodeMap; 3] = [OpcodeMap::Map0F, OpcodeMap::Map0F38, OpcodeMap::Map0F3A];

    pub fn name(&self) -> &'static str {
        match self {
            OpcodeMap::Map0F => "0F",
            OpcodeMap::Map0F38 => "0F38",
            OpcodeMap::Map0F3A => "0F3A",
        }
    }
}

/// Legacy prefix implied by `EVEX.pp`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MandatoryPrefix {
    None,
    P66,
    PF3,
    PF2,
}

impl MandatoryPrefix {
    pub const ALL: [MandatoryPrefix; 4] = [
        MandatoryPrefix::None, MandatoryPrefix::P66, MandatoryPrefix::PF3, MandatoryPrefix::PF2,
    ];

    /// Decodes the low two bits of `pp`.
    pub fn from_pp(pp: u8) -> Self {
        match pp & 0b11 {
            0 => MandatoryPrefix::None,
            1 => MandatoryPrefix::P66,
            2 => MandatoryPrefix::PF3,
            _ => MandatoryPrefix::PF2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MandatoryPrefix::None => "NP",
            MandatoryPrefix::P66 => "66",
            MandatoryPrefix::PF3 => "F3",
            MandatoryPrefix::PF2 => "F2",
        }
    }
}

/// Declares a `Handler::Shape` static per line.
macro_rules! shapes {
    ( $( $name:ident = $shape:expr; )* ) => {
        $( static $name: Handler = Handler::Shape($shape); )*
    };
}

/// Declares a `Handler::VectorLength` static. Use `-` for a missing width.
macro_rules! lengths {
    ( @h - ) => { &INVALID };
    ( @h $h:ident ) => { &$h };
    ( $name:ident = $ctor:ident($a:tt, $b:tt, $c:tt); ) => {
        static $name: Handler = Handler::VectorLength(
            LengthDispatch::$ctor(lengths!(@h $a), lengths!(@h $b), lengths!(@h $c))
        );
    };
}

static INVALID: Handler = Handler::Invalid;

// 0F map

shapes! {
    MOVAPS_128 = vk_w(Xmm, Xmm, Code::Vmovaps128, FullMem(L128));
    MOVAPS_256 = vk_w(Ymm, Ymm, Code::Vmovaps256, FullMem(L256));
    MOVAPS_512 = vk_w(Zmm, Zmm, Code::Vmovaps512, FullMem(L512));
    MOVAPS_ST_128 = wk_v(Xmm, Xmm, Code::VmovapsStore128, FullMem(L128));
    MOVAPS_ST_256 = wk_v(Ymm, Ymm, Code::VmovapsStore256, FullMem(L256));
    MOVAPS_ST_512 = wk_v(Zmm, Zmm, Code::VmovapsStore512, FullMem(L512));
    MOVHLPS = v_hw(Xmm, Code::Vmovhlps, Code::Vmovlps, Tuple2(4));
    MOVHPD = v_hm(Xmm, Code::Vmovhpd, Tuple1Scalar(8));
    CVTSI2SS = v_h_ev_er(Xmm, Code::Vcvtsi2ssR32, Code::Vcvtsi2ssR64,
                         Tuple1Scalar(4), Tuple1Scalar(8), Rounding::Embedded);
    CVTSI2SD = v_h_ev_er(Xmm, Code::Vcvtsi2sdR32, Code::Vcvtsi2sdR64,
                         Tuple1Scalar(4), Tuple1Scalar(8), Rounding::EmbeddedW1);
    MOVNTPS_128 = m_v(Xmm, Code::Vmovntps128, FullMem(L128));
    MOVNTPS_256 = m_v(Ymm, Code::Vmovntps256, FullMem(L256));
    MOVNTPS_512 = m_v(Zmm, Code::Vmovntps512, FullMem(L512));
    CVTTSS2SI = gv_w_er(Xmm, Code::Vcvttss2siR32, Code::Vcvttss2siR64, Tuple1Fixed(4), Rounding::Sae);
    CVTSS2SI = gv_w_er(Xmm, Code::Vcvtss2siR32, Code::Vcvtss2siR64, Tuple1Fixed(4), Rounding::Embedded);
    UCOMISS = v_w_er(Xmm, Code::Vucomiss, Tuple1Scalar(4), Rounding::Sae);
    SQRTPS_128 = vk_w_er(Xmm, Xmm, Code::Vsqrtps128, Full32(L128), Rounding::Embedded);
    SQRTPS_256 = vk_w_er(Ymm, Ymm, Code::Vsqrtps256, Full32(L256), Rounding::Embedded);
    SQRTPS_512 = vk_w_er(Zmm, Zmm, Code::Vsqrtps512, Full32(L512), Rounding::Embedded);
    ADDPS_128 = vk_hw_er(Xmm, Code::Vaddps128, Full32(L128), Rounding::Embedded);
    ADDPS_256 = vk_hw_er(Ymm, Code::Vaddps256, Full32(L256), Rounding::Embedded);
    ADDPS_512 = vk_hw_er(Zmm, Code::Vaddps512, Full32(L512), Rounding::Embedded);
    ADDPD_128 = vk_hw_er(Xmm, Code::Vaddpd128, Full64(L128), Rounding::Embedded);
    ADDPD_256 = vk_hw_er(Ymm, Code::Vaddpd256, Full64(L256), Rounding::Embedded);
    ADDPD_512 = vk_hw_er(Zmm, Code::Vaddpd512, Full64(L512), Rounding::Embedded);
    MOVD_TO_XMM = vx_ev(Code::VmovdXmmRm32, Code::VmovqXmmRm64, Tuple1Scalar(4), Tuple1Scalar(8));
    MOVD_FROM_XMM = ev_vx(Code::VmovdRm32Xmm, Code::VmovqRm64Xmm, Tuple1Scalar(4), Tuple1Scalar(8));
    MOVQ_LOAD = v_w(Xmm, Xmm, Code::VmovqXmmXmmm64, Tuple1Scalar(8));
    MOVQ_STORE = w_v(Xmm, Xmm, Code::VmovqXmmm64Xmm, Tuple1Scalar(8));
    MOVSS_REG = wk_hv(Xmm, Code::VmovssXmmXmmXmm);
    MOVSS_MEM = wk_v(Xmm, Xmm, Code::VmovssM32Xmm, Tuple1Scalar(4));
    PSHUFD_128 = vk_w_ib(Xmm, Xmm, Code::Vpshufd128, Full32(L128));
    PSHUFD_256 = vk_w_ib(Ymm, Ymm, Code::Vpshufd256, Full32(L256));
    PSHUFD_512 = vk_w_ib(Zmm, Zmm, Code::Vpshufd512, Full32(L512));
    PSLLD_128 = hk_w_ib(Xmm, Code::VpslldImm128, Full32(L128));
    PSLLD_256 = hk_w_ib(Ymm, Code::VpslldImm256, Full32(L256));
    PSLLD_512 = hk_w_ib(Zmm, Code::VpslldImm512, Full32(L512));
    PCMPEQB_128 = kk_hw(Xmm, Code::Vpcmpeqb128, FullMem(L128));
    PCMPEQB_256 = kk_hw(Ymm, Code::Vpcmpeqb256, FullMem(L256));
    PCMPEQB_512 = kk_hw(Zmm, Code::Vpcmpeqb512, FullMem(L512));
    CMPPS_128 = kk_hw_ib(Xmm, Code::Vcmpps128, Full32(L128));
    CMPPS_256 = kk_hw_ib(Ymm, Code::Vcmpps256, Full32(L256));
    CMPPS_512 = kk_hw_ib(Zmm, Code::Vcmpps512, Full32(L512));
    PINSRW = v_h_ev_ib(Xmm, Code::VpinsrwR32, Code::VpinsrwR64, Tuple1Scalar(2), Tuple1Scalar(2));
    PEXTRW = ev_vx_ib(Xmm, Code::VpextrwR32, Code::VpextrwR64);
    SHUFPS_128 = vk_hw_ib(Xmm, Xmm, Xmm, Code::Vshufps128, Full32(L128));
    SHUFPS_256 = vk_hw_ib(Ymm, Ymm, Ymm, Code::Vshufps256, Full32(L256));
    SHUFPS_512 = vk_hw_ib(Zmm, Zmm, Zmm, Code::Vshufps512, Full32(L512));
    PANDD_128 = vk_hw(Xmm, Xmm, Xmm, Code::Vpandd128, Full32(L128));
    PANDD_256 = vk_hw(Ymm, Ymm, Ymm, Code::Vpandd256, Full32(L256));
    PANDD_512 = vk_hw(Zmm, Zmm, Zmm, Code::Vpandd512, Full32(L512));
    MOVNTDQ_128 = m_v(Xmm, Code::Vmovntdq128, FullMem(L128));
    MOVNTDQ_256 = m_v(Ymm, Code::Vmovntdq256, FullMem(L256));
    MOVNTDQ_512 = m_v(Zmm, Code::Vmovntdq512, FullMem(L512));
}

lengths! { MOVAPS = new(MOVAPS_128, MOVAPS_256, MOVAPS_512); }
lengths! { MOVAPS_ST = new(MOVAPS_ST_128, MOVAPS_ST_256, MOVAPS_ST_512); }
lengths! { MOVHLPS_L = new(MOVHLPS, -, -); }
lengths! { MOVHPD_L = new(MOVHPD, -, -); }
lengths! { MOVNTPS = new(MOVNTPS_128, MOVNTPS_256, MOVNTPS_512); }
lengths! { SQRTPS = with_rounding(SQRTPS_128, SQRTPS_256, SQRTPS_512); }
lengths! { ADDPS = with_rounding(ADDPS_128, ADDPS_256, ADDPS_512); }
lengths! { ADDPD = with_rounding(ADDPD_128, ADDPD_256, ADDPD_512); }
lengths! { MOVD_TO_XMM_L = new(MOVD_TO_XMM, -, -); }
lengths! { MOVD_FROM_XMM_L = new(MOVD_FROM_XMM, -, -); }
lengths! { MOVQ_LOAD_L = new(MOVQ_LOAD, -, -); }
lengths! { MOVQ_STORE_L = new(MOVQ_STORE, -, -); }
lengths! { PSHUFD = new(PSHUFD_128, PSHUFD_256, PSHUFD_512); }
lengths! { PSLLD = new(PSLLD_128, PSLLD_256, PSLLD_512); }
lengths! { PCMPEQB = new(PCMPEQB_128, PCMPEQB_256, PCMPEQB_512); }
lengths! { CMPPS = with_rounding(CMPPS_128, CMPPS_256, CMPPS_512); }
lengths! { PINSRW_L = new(PINSRW, -, -); }
lengths! { PEXTRW_L = new(PEXTRW, -, -); }
lengths! { SHUFPS = new(SHUFPS_128, SHUFPS_256, SHUFPS_512); }
lengths! { PANDD = new(PANDD_128, PANDD_256, PANDD_512); }
lengths! { MOVNTDQ = new(MOVNTDQ_128, MOVNTDQ_256, MOVNTDQ_512); }

static MOVSS: Handler = Handler::RegOrMem { reg: &MOVSS_REG, mem: &MOVSS_MEM };
static GROUP_72: Handler = Handler::Group([
    &INVALID, &INVALID, &INVALID, &INVALID, &INVALID, &INVALID, &PSLLD, &INVALID,
]);

// 0F38 map

shapes! {
    CVTPH2PS_128 = vk_w_er(Xmm, Xmm, Code::Vcvtph2ps128, HalfMem(L128), Rounding::Sae);
    CVTPH2PS_256 = vk_w_er(Ymm, Xmm, Code::Vcvtph2ps256, HalfMem(L256), Rounding::Sae);
    CVTPH2PS_512 = vk_w_er(Zmm, Ymm, Code::Vcvtph2ps512, HalfMem(L512), Rounding::Sae);
    BROADCASTSS_128 = vk_w(Xmm, Xmm, Code::Vbroadcastss128, Tuple1Scalar(4));
    BROADCASTSS_256 = vk_w(Ymm, Xmm, Code::Vbroadcastss256, Tuple1Scalar(4));
    BROADCASTSS_512 = vk_w(Zmm, Xmm, Code::Vbroadcastss512, Tuple1Scalar(4));
    BROADCASTF32X4_256 = vk_m(Ymm, Code::Vbroadcastf32x4Ymm, Tuple4(4));
    BROADCASTF32X4_512 = vk_m(Zmm, Code::Vbroadcastf32x4Zmm, Tuple4(4));
    PMOVM2B_128 = v_k(Xmm, Code::Vpmovm2b128);
    PMOVM2B_256 = v_k(Ymm, Code::Vpmovm2b256);
    PMOVM2B_512 = v_k(Zmm, Code::Vpmovm2b512);
    PMOVB2M_128 = kr(Xmm, Code::Vpmovb2m128);
    PMOVB2M_256 = kr(Ymm, Code::Vpmovb2m256);
    PMOVB2M_512 = kr(Zmm, Code::Vpmovb2m512);
    MOVNTDQA_128 = v_m(Xmm, Code::Vmovntdqa128, FullMem(L128));
    MOVNTDQA_256 = v_m(Ymm, Code::Vmovntdqa256, FullMem(L256));
    MOVNTDQA_512 = v_m(Zmm, Code::Vmovntdqa512, FullMem(L512));
    PMOVDB_128 = wk_v(Xmm, Xmm, Code::Vpmovdb128, QuarterMem(L128));
    PMOVDB_256 = wk_v(Xmm, Ymm, Code::Vpmovdb256, QuarterMem(L256));
    PMOVDB_512 = wk_v(Xmm, Zmm, Code::Vpmovdb512, QuarterMem(L512));
    P4DPWSSD = vk_hm(Zmm, Code::Vp4dpwssd, Tuple1_4X);
    P2INTERSECTD_128 = kp1_hw(Xmm, Code::Vp2intersectd128, Full32(L128));
    P2INTERSECTD_256 = kp1_hw(Ymm, Code::Vp2intersectd256, Full32(L256));
    P2INTERSECTD_512 = kp1_hw(Zmm, Code::Vp2intersectd512, Full32(L512));
    PBROADCASTB_128 = vk_ev_rexw(Xmm, Code::Vpbroadcastb128, Code::Invalid);
    PBROADCASTB_256 = vk_ev_rexw(Ymm, Code::Vpbroadcastb256, Code::Invalid);
    PBROADCASTB_512 = vk_ev_rexw(Zmm, Code::Vpbroadcastb512, Code::Invalid);
    PBROADCASTD_128 = vk_ev_rexw(Xmm, Code::Vpbroadcastd128, Code::Vpbroadcastq128);
    PBROADCASTD_256 = vk_ev_rexw(Ymm, Code::Vpbroadcastd256, Code::Vpbroadcastq256);
    PBROADCASTD_512 = vk_ev_rexw(Zmm, Code::Vpbroadcastd512, Code::Vpbroadcastq512);
    GATHERDPS_128 = vk_vsib(Xmm, Xmm, Code::Vgatherdps128, Tuple1Scalar(4));
    GATHERDPS_256 = vk_vsib(Ymm, Ymm, Code::Vgatherdps256, Tuple1Scalar(4));
    GATHERDPS_512 = vk_vsib(Zmm, Zmm, Code::Vgatherdps512, Tuple1Scalar(4));
    SCATTERDPS_128 = vsib_k1_vx(Xmm, Xmm, Code::Vscatterdps128, Tuple1Scalar(4));
    SCATTERDPS_256 = vsib_k1_vx(Ymm, Ymm, Code::Vscatterdps256, Tuple1Scalar(4));
    SCATTERDPS_512 = vsib_k1_vx(Zmm, Zmm, Code::Vscatterdps512, Tuple1Scalar(4));
    GATHERPF0DPS = vsib_k1(Zmm, Code::Vgatherpf0dps, Tuple1Scalar(4));
    AESENC_128 = v_hw(Xmm, Code::Vaesenc128, Code::Vaesenc128, FullMem(L128));
    AESENC_256 = v_hw(Ymm, Code::Vaesenc256, Code::Vaesenc256, FullMem(L256));
    AESENC_512 = v_hw(Zmm, Code::Vaesenc512, Code::Vaesenc512, FullMem(L512));
}

lengths! { CVTPH2PS = with_rounding(CVTPH2PS_128, CVTPH2PS_256, CVTPH2PS_512); }
lengths! { BROADCASTSS = new(BROADCASTSS_128, BROADCASTSS_256, BROADCASTSS_512); }
lengths! { BROADCASTF32X4 = new(-, BROADCASTF32X4_256, BROADCASTF32X4_512); }
lengths! { PMOVM2B = new(PMOVM2B_128, PMOVM2B_256, PMOVM2B_512); }
lengths! { PMOVB2M = new(PMOVB2M_128, PMOVB2M_256, PMOVB2M_512); }
lengths! { MOVNTDQA = new(MOVNTDQA_128, MOVNTDQA_256, MOVNTDQA_512); }
lengths! { PMOVDB = new(PMOVDB_128, PMOVDB_256, PMOVDB_512); }
lengths! { P4DPWSSD_L = new(-, -, P4DPWSSD); }
lengths! { P2INTERSECTD = new(P2INTERSECTD_128, P2INTERSECTD_256, P2INTERSECTD_512); }
lengths! { PBROADCASTB = new(PBROADCASTB_128, PBROADCASTB_256, PBROADCASTB_512); }
lengths! { PBROADCASTD = new(PBROADCASTD_128, PBROADCASTD_256, PBROADCASTD_512); }
lengths! { GATHERDPS = new(GATHERDPS_128, GATHERDPS_256, GATHERDPS_512); }
lengths! { SCATTERDPS = new(SCATTERDPS_128, SCATTERDPS_256, SCATTERDPS_512); }
lengths! { GATHERPF0DPS_L = new(-, -, GATHERPF0DPS); }
lengths! { AESENC = new(AESENC_128, AESENC_256, AESENC_512); }

static GROUP_C6: Handler = Handler::Group([
    &INVALID, &GATHERPF0DPS_L, &INVALID, &INVALID, &INVALID, &INVALID, &INVALID, &INVALID,
]);

// 0F3A map

shapes! {
    ALIGND_128 = vk_hw_ib(Xmm, Xmm, Xmm, Code::Valignd128, Full32(L128));
    ALIGND_256 = vk_hw_ib(Ymm, Ymm, Ymm, Code::Valignd256, Full32(L256));
    ALIGND_512 = vk_hw_ib(Zmm, Zmm, Zmm, Code::Valignd512, Full32(L512));
    RNDSCALEPS_128 = vk_w_ib_er(Xmm, Code::Vrndscaleps128, Full32(L128), Rounding::Sae);
    RNDSCALEPS_256 = vk_w_ib_er(Ymm, Code::Vrndscaleps256, Full32(L256), Rounding::Sae);
    RNDSCALEPS_512 = vk_w_ib_er(Zmm, Code::Vrndscaleps512, Full32(L512), Rounding::Sae);
    RNDSCALESS = vk_hw_ib_er(Xmm, Code::Vrndscaless, Tuple1Scalar(4), Rounding::Sae);
    PEXTRB = gvm_vx_ib(Xmm, Code::VpextrbR32, Code::VpextrbR64, Tuple1Scalar(1), Tuple1Scalar(1));
    PEXTRD = ed_v_ib(Xmm, Code::Vpextrd, Code::Vpextrq, Tuple1Scalar(4), Tuple1Scalar(8));
    INSERTF32X4_256 = vk_hw_ib(Ymm, Ymm, Xmm, Code::Vinsertf32x4Ymm, Tuple4(4));
    INSERTF32X4_512 = vk_hw_ib(Zmm, Zmm, Xmm, Code::Vinsertf32x4Zmm, Tuple4(4));
    EXTRACTF32X4_256 = wk_v_ib(Xmm, Ymm, Code::Vextractf32x4Ymm, Tuple4(4));
    EXTRACTF32X4_512 = wk_v_ib(Xmm, Zmm, Code::Vextractf32x4Zmm, Tuple4(4));
    CVTPS2PH_128 = wk_v_ib_er(Xmm, Xmm, Code::Vcvtps2ph128, HalfMem(L128), Rounding::Sae);
    CVTPS2PH_256 = wk_v_ib_er(Xmm, Ymm, Code::Vcvtps2ph256, HalfMem(L256), Rounding::Sae);
    CVTPS2PH_512 = wk_v_ib_er(Ymm, Zmm, Code::Vcvtps2ph512, HalfMem(L512), Rounding::Sae);
    PCMPUD_128 = kk_hw_ib_nosae(Xmm, Code::Vpcmpud128, Full32(L128));
    PCMPUD_256 = kk_hw_ib_nosae(Ymm, Code::Vpcmpud256, Full32(L256));
    PCMPUD_512 = kk_hw_ib_nosae(Zmm, Code::Vpcmpud512, Full32(L512));
    PINSRD = v_h_ev_ib(Xmm, Code::Vpinsrd, Code::Vpinsrq, Tuple1Scalar(4), Tuple1Scalar(8));
    PTERNLOGD_128 = vk_hw_ib(Xmm, Xmm, Xmm, Code::Vpternlogd128, Full32(L128));
    PTERNLOGD_256 = vk_hw_ib(Ymm, Ymm, Ymm, Code::Vpternlogd256, Full32(L256));
    PTERNLOGD_512 = vk_hw_ib(Zmm, Zmm, Zmm, Code::Vpternlogd512, Full32(L512));
    PCLMULQDQ_128 = v_hw_ib(Xmm, Code::Vpclmulqdq128, FullMem(L128));
    PCLMULQDQ_256 = v_hw_ib(Ymm, Code::Vpclmulqdq256, FullMem(L256));
    PCLMULQDQ_512 = v_hw_ib(Zmm, Code::Vpclmulqdq512, FullMem(L512));
    FIXUPIMMPS_128 = vk_hw_ib_er(Xmm, Code::Vfixupimmps128, Full32(L128), Rounding::Sae);
    FIXUPIMMPS_256 = vk_hw_ib_er(Ymm, Code::Vfixupimmps256, Full32(L256), Rounding::Sae);
    FIXUPIMMPS_512 = vk_hw_ib_er(Zmm, Code::Vfixupimmps512, Full32(L512), Rounding::Sae);
    FPCLASSPS_128 = kk_w_ib(Xmm, Code::Vfpclassps128, Full32(L128));
    FPCLASSPS_256 = kk_w_ib(Ymm, Code::Vfpclassps256, Full32(L256));
    FPCLASSPS_512 = kk_w_ib(Zmm, Code::Vfpclassps512, Full32(L512));
}

lengths! { ALIGND = new(ALIGND_128, ALIGND_256, ALIGND_512); }
lengths! { RNDSCALEPS = with_rounding(RNDSCALEPS_128, RNDSCALEPS_256, RNDSCALEPS_512); }
lengths! { PEXTRB_L = new(PEXTRB, -, -); }
lengths! { PEXTRD_L = new(PEXTRD, -, -); }
lengths! { INSERTF32X4 = new(-, INSERTF32X4_256, INSERTF32X4_512); }
lengths! { EXTRACTF32X4 = new(-, EXTRACTF32X4_256, EXTRACTF32X4_512); }
lengths! { CVTPS2PH = with_rounding(CVTPS2PH_128, CVTPS2PH_256, CVTPS2PH_512); }
lengths! { PCMPUD = new(PCMPUD_128, PCMPUD_256, PCMPUD_512); }
lengths! { PINSRD_L = new(PINSRD, -, -); }
lengths! { PTERNLOGD = new(PTERNLOGD_128, PTERNLOGD_256, PTERNLOGD_512); }
lengths! { PCLMULQDQ = new(PCLMULQDQ_128, PCLMULQDQ_256, PCLMULQDQ_512); }
lengths! { FIXUPIMMPS = with_rounding(FIXUPIMMPS_128, FIXUPIMMPS_256, FIXUPIMMPS_512); }
lengths! { FPCLASSPS = new(FPCLASSPS_128, FPCLASSPS_256, FPCLASSPS_512); }

/// Looks up the handler for an opcode.
///
/// `w` is the raw `EVEX.W` bit. Unknown opcodes map to `Handler::Invalid`.
pub fn lookup(map: OpcodeMap, pp: MandatoryPrefix, opcode: u8, w: bool) -> &'static Handler {
    use self::MandatoryPrefix::*;
    use self::OpcodeMap::*;

    match (map, pp, opcode, w) {
        (Map0F, None, 0x28, false) => &MOVAPS,
        (Map0F, None, 0x29, false) => &MOVAPS_ST,
        (Map0F, None, 0x12, false) => &MOVHLPS_L,
        (Map0F, P66, 0x16, true) => &MOVHPD_L,
        (Map0F, PF3, 0x2A, _) => &CVTSI2SS,
        (Map0F, PF2, 0x2A, _) => &CVTSI2SD,
        (Map0F, None, 0x2B, false) => &MOVNTPS,
        (Map0F, PF3, 0x2C, _) => &CVTTSS2SI,
        (Map0F, PF3, 0x2D, _) => &CVTSS2SI,
        (Map0F, None, 0x2E, false) => &UCOMISS,
        (Map0F, None, 0x51, false) => &SQRTPS,
        (Map0F, None, 0x58, false) => &ADDPS,
        (Map0F, P66, 0x58, true) => &ADDPD,
        (Map0F, P66, 0x6E, _) => &MOVD_TO_XMM_L,
        (Map0F, P66, 0x7E, _) => &MOVD_FROM_XMM_L,
        (Map0F, PF3, 0x7E, true) => &MOVQ_LOAD_L,
        (Map0F, P66, 0xD6, true) => &MOVQ_STORE_L,
        (Map0F, PF3, 0x11, false) => &MOVSS,
        (Map0F, P66, 0x70, false) => &PSHUFD,
        (Map0F, P66, 0x72, false) => &GROUP_72,
        (Map0F, P66, 0x74, _) => &PCMPEQB,
        (Map0F, None, 0xC2, false) => &CMPPS,
        (Map0F, P66, 0xC4, _) => &PINSRW_L,
        (Map0F, P66, 0xC5, _) => &PEXTRW_L,
        (Map0F, None, 0xC6, false) => &SHUFPS,
        (Map0F, P66, 0xDB, false) => &PANDD,
        (Map0F, P66, 0xE7, false) => &MOVNTDQ,

        (Map0F38, P66, 0x13, false) => &CVTPH2PS,
        (Map0F38, P66, 0x18, false) => &BROADCASTSS,
        (Map0F38, P66, 0x1A, false) => &BROADCASTF32X4,
        (Map0F38, PF3, 0x28, false) => &PMOVM2B,
        (Map0F38, PF3, 0x29, false) => &PMOVB2M,
        (Map0F38, P66, 0x2A, false) => &MOVNTDQA,
        (Map0F38, PF3, 0x31, false) => &PMOVDB,
        (Map0F38, PF2, 0x52, false) => &P4DPWSSD_L,
        (Map0F38, PF2, 0x68, false) => &P2INTERSECTD,
        (Map0F38, P66, 0x7A, _) => &PBROADCASTB,
        (Map0F38, P66, 0x7C, _) => &PBROADCASTD,
        (Map0F38, P66, 0x92, false) => &GATHERDPS,
        (Map0F38, P66, 0xA2, false) => &SCATTERDPS,
        (Map0F38, P66, 0xC6, false) => &GROUP_C6,
        (Map0F38, P66, 0xDC, _) => &AESENC,

        (Map0F3A, P66, 0x03, false) => &ALIGND,
        (Map0F3A, P66, 0x08, false) => &RNDSCALEPS,
        (Map0F3A, P66, 0x0A, false) => &RNDSCALESS,
        (Map0F3A, P66, 0x14, _) => &PEXTRB_L,
        (Map0F3A, P66, 0x16, _) => &PEXTRD_L,
        (Map0F3A, P66, 0x18, false) => &INSERTF32X4,
        (Map0F3A, P66, 0x19, false) => &EXTRACTF32X4,
        (Map0F3A, P66, 0x1D, false) => &CVTPS2PH,
        (Map0F3A, P66, 0x1E, false) => &PCMPUD,
        (Map0F3A, P66, 0x22, _) => &PINSRD_L,
        (Map0F3A, P66, 0x25, false) => &PTERNLOGD,
        (Map0F3A, P66, 0x44, _) => &PCLMULQDQ,
        (Map0F3A, P66, 0x54, false) => &FIXUPIMMPS,
        (Map0F3A, P66, 0x66, false) => &FPCLASSPS,

        _ => &INVALID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evex::shape::Shape;

    /// Collects every leaf shape reachable from `handler`.
    fn leaves(handler: &'static Handler, out: &mut Vec<&'static Shape>) {
        match *handler {
            Handler::Invalid => {}
            Handler::Shape(ref shape) => out.push(shape),
            Handler::VectorLength(ref dispatch) => {
                use evex::state::{DecodedState, VectorLength};
                let mut state = DecodedState::default();
                for &len in &[VectorLength::L128, VectorLength::L256, VectorLength::L512] {
                    state.vector_length = len;
                    leaves(dispatch.select(&state), out);
                }
            }
            Handler::Group(ref handlers) => {
                for &h in handlers.iter() {
                    leaves(h, out);
                }
            }
            Handler::RegOrMem { reg, mem } => {
                leaves(reg, out);
                leaves(mem, out);
            }
            Handler::Evex(fallback) => leaves(fallback, out),
        }
    }

    fn all_shapes() -> Vec<&'static Shape> {
        let mut out = Vec::new();
        for &map in OpcodeMap::ALL.iter() {
            for &pp in MandatoryPrefix::ALL.iter() {
                for opcode in 0..=255u8 {
                    for &w in &[false, true] {
                        leaves(lookup(map, pp, opcode, w), &mut out);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn unknown_is_invalid() {
        assert!(lookup(OpcodeMap::Map0F, MandatoryPrefix::None, 0x00, false).is_invalid());
        // W1 form of a W0 opcode
        assert!(lookup(OpcodeMap::Map0F, MandatoryPrefix::None, 0x58, true).is_invalid());
        assert!(!lookup(OpcodeMap::Map0F, MandatoryPrefix::P66, 0x58, true).is_invalid());
    }

    #[test]
    fn w_ignored_entries() {
        for &(map, pp, opcode) in &[(OpcodeMap::Map0F38, MandatoryPrefix::P66, 0x7A),
                                    (OpcodeMap::Map0F38, MandatoryPrefix::P66, 0x7C),
                                    (OpcodeMap::Map0F, MandatoryPrefix::PF3, 0x2A)] {
            assert_eq!(lookup(map, pp, opcode, false), lookup(map, pp, opcode, true));
        }
    }

    #[test]
    fn every_code_resolvable() {
        let shapes = all_shapes();
        assert!(shapes.len() > 100);
        for shape in shapes {
            assert!(shape.roles[0] != ::evex::shape::Role::Absent, "{:?}", shape);
        }
    }

    #[test]
    fn names() {
        assert_eq!(OpcodeMap::Map0F38.name(), "0F38");
        assert_eq!(MandatoryPrefix::from_pp(0x7D).name(), "66");
    }
}

use super::Cpu;
use crate::config::TimerMode;
use crate::display::{Display, Screen};
use crate::error::Error;
use crate::font::{self, FONT_ADDRESS_START};
use crate::operation::OperationType;
use crate::registers::FLAG;
use crate::START_ADDRESS;

/// Stand-in screen that records calls and reports a canned collision.
#[derive(Default)]
struct RecordingDisplay {
    clears: usize,
    draws: Vec<(Vec<u8>, u8, u8)>,
    collision: bool,
}

impl Display for RecordingDisplay {
    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        self.draws.push((sprite.to_vec(), x, y));
        self.collision
    }
}

fn cpu_with(rom: &[u8], registers: &[(usize, u8)]) -> Cpu {
    let mut cpu = Cpu::default().with_seed(0x5EED);
    font::load(cpu.memory_mut()).unwrap();
    cpu.memory_mut()
        .write_range(START_ADDRESS as usize, rom)
        .unwrap();
    for (index, value) in registers {
        cpu.registers_mut().set(*index, *value).unwrap();
    }
    cpu
}

fn step(cpu: &mut Cpu) -> OperationType {
    cpu.cycle(&mut RecordingDisplay::default()).unwrap()
}

fn v(cpu: &Cpu, index: usize) -> u8 {
    cpu.registers().get(index).unwrap()
}

#[test]
fn fetch_is_big_endian_and_advances_by_two() {
    let mut cpu = cpu_with(&[0xAB, 0xCD, 0x12, 0x34], &[]);
    assert_eq!(cpu.fetch().unwrap(), 0xABCD);
    assert_eq!(cpu.program_counter(), 0x202);
    assert_eq!(cpu.fetch().unwrap(), 0x1234);
    assert_eq!(cpu.program_counter(), 0x204);
}

#[test]
fn unhandled_operation_is_surfaced() {
    let mut cpu = cpu_with(&[0xF0, 0x1F], &[]);
    let err = cpu.cycle(&mut RecordingDisplay::default()).unwrap_err();
    match err {
        Error::UnhandledOperation { operation } => {
            assert_eq!(operation.opcode, 0xF01F);
            assert_eq!(operation.nn, 0x1F);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(cpu.program_counter(), 0x202);
}

#[test]
fn clear_screen() {
    let mut cpu = cpu_with(&[0x00, 0xE0], &[]);
    let mut display = RecordingDisplay::default();
    assert_eq!(cpu.cycle(&mut display).unwrap(), OperationType::ClearScreen);
    assert_eq!(display.clears, 1);
}

#[test]
fn nested_calls_then_return() {
    let mut cpu = cpu_with(&[0x22, 0x02, 0x22, 0x04, 0x00, 0xEE], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);
    assert_eq!(cpu.stack(), &[0x202]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);
    assert_eq!(cpu.stack(), &[0x202, 0x204]);
    assert_eq!(step(&mut cpu), OperationType::Return);
    assert_eq!(cpu.program_counter(), 0x204);
    assert_eq!(cpu.stack_depth(), 1);
}

#[test]
fn call_then_return_round_trip() {
    let mut cpu = cpu_with(&[0x24, 0x28], &[]);
    cpu.memory_mut().write_range(0x428, &[0x00, 0xEE]).unwrap();

    assert_eq!(step(&mut cpu), OperationType::Call);
    assert_eq!(cpu.program_counter(), 0x428);
    assert_eq!(cpu.stack_depth(), 1);

    assert_eq!(step(&mut cpu), OperationType::Return);
    assert_eq!(cpu.program_counter(), 0x202);
    assert_eq!(cpu.stack_depth(), 0);
}

#[test]
fn stack_overflow_leaves_state_untouched() {
    // 0x200: call 0x200, forever
    let mut cpu = cpu_with(&[0x22, 0x00], &[]);
    for _ in 0..16 {
        step(&mut cpu);
    }
    assert_eq!(cpu.stack_depth(), 16);
    let err = cpu.cycle(&mut RecordingDisplay::default()).unwrap_err();
    assert!(matches!(err, Error::StackOverflow { depth: 16 }));
    assert_eq!(cpu.stack_depth(), 16);
}

#[test]
fn return_on_empty_stack() {
    let mut cpu = cpu_with(&[0x00, 0xEE], &[]);
    let err = cpu.cycle(&mut RecordingDisplay::default()).unwrap_err();
    assert!(matches!(err, Error::StackUnderflow));
    assert_eq!(cpu.stack_depth(), 0);
}

#[test]
fn jump() {
    let mut cpu = cpu_with(&[0x12, 0x28], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x228);
}

#[test]
fn jump_with_offset() {
    let mut cpu = cpu_with(&[0xB3, 0x00], &[(0x0, 0x04)]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x304);
}

#[test]
fn skip_if_vx_nn() {
    let mut cpu = cpu_with(&[0x36, 0x2B], &[(0x6, 0x2B)]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);

    let mut cpu = cpu_with(&[0x36, 0x2B], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);

    let mut cpu = cpu_with(&[0x45, 0x2A], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);

    let mut cpu = cpu_with(&[0x45, 0x2A], &[(0x5, 0x2A)]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);
}

#[test]
fn skip_if_vx_vy() {
    let mut cpu = cpu_with(&[0x54, 0x20], &[(0x4, 0x9), (0x2, 0x9)]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);

    let mut cpu = cpu_with(&[0x54, 0x20], &[(0x4, 0x9)]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);

    let mut cpu = cpu_with(&[0x94, 0x20], &[(0x4, 0x9)]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);

    let mut cpu = cpu_with(&[0x94, 0x20], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);
}

#[test]
fn set_register_and_add_wrap_without_flag() {
    let mut cpu = cpu_with(&[0x60, 0xFF, 0x70, 0x02], &[(FLAG, 0x7)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x0), 0xFF);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x0), 0x01);
    assert_eq!(v(&cpu, FLAG), 0x7);
}

#[test]
fn bitwise_ops() {
    let regs = [(0x5, 0b1100), (0x6, 0b1010)];

    let mut cpu = cpu_with(&[0x85, 0x60], &regs);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0b1010);

    let mut cpu = cpu_with(&[0x85, 0x61], &regs);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0b1110);

    let mut cpu = cpu_with(&[0x85, 0x62], &regs);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0b1000);

    let mut cpu = cpu_with(&[0x85, 0x63], &regs);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0b0110);
}

#[test]
fn add_vy_sets_carry() {
    let mut cpu = cpu_with(&[0x85, 0x64], &[(0x5, 0xFF), (0x6, 0x01)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x00);
    assert_eq!(v(&cpu, FLAG), 1);

    let mut cpu = cpu_with(&[0x85, 0x64], &[(0x5, 0x00), (0x6, 0x01)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x01);
    assert_eq!(v(&cpu, FLAG), 0);

    // exactly 0xFF still fits in a byte
    let mut cpu = cpu_with(&[0x85, 0x64], &[(0x5, 0xFE), (0x6, 0x01)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0xFF);
    assert_eq!(v(&cpu, FLAG), 0);
}

#[test]
fn sub_vy_sets_not_borrow() {
    let mut cpu = cpu_with(&[0x85, 0x65], &[(0x5, 0xFF), (0x6, 0x01)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0xFE);
    assert_eq!(v(&cpu, FLAG), 1);

    let mut cpu = cpu_with(&[0x85, 0x65], &[(0x5, 0x01), (0x6, 0xFF)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x02);
    assert_eq!(v(&cpu, FLAG), 0);

    let mut cpu = cpu_with(&[0x85, 0x65], &[(0x5, 0x10), (0x6, 0x10)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x00);
    assert_eq!(v(&cpu, FLAG), 0);
}

#[test]
fn subn_sets_not_borrow() {
    let mut cpu = cpu_with(&[0x85, 0x67], &[(0x5, 0x01), (0x6, 0xFF)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0xFE);
    assert_eq!(v(&cpu, FLAG), 1);

    let mut cpu = cpu_with(&[0x85, 0x67], &[(0x5, 0xFF), (0x6, 0x01)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x02);
    assert_eq!(v(&cpu, FLAG), 0);
}

#[test]
fn shift_right() {
    let mut cpu = cpu_with(&[0x85, 0x66], &[(0x5, 0x1), (0x6, 0x3)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x1);
    assert_eq!(v(&cpu, FLAG), 1);

    let mut cpu = cpu_with(&[0x85, 0x66], &[(0x5, 0x2), (0x6, 0x2)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x1);
    assert_eq!(v(&cpu, FLAG), 0);
}

#[test]
fn shift_left() {
    let mut cpu = cpu_with(&[0x85, 0x6E], &[(0x5, 0x80), (0x6, 0x81)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x02);
    assert_eq!(v(&cpu, FLAG), 1);

    let mut cpu = cpu_with(&[0x85, 0x6E], &[(0x5, 0x01), (0x6, 0x01)]);
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x5), 0x02);
    assert_eq!(v(&cpu, FLAG), 0);
}

#[test]
fn set_index() {
    let mut cpu = cpu_with(&[0xA2, 0x2A], &[]);
    step(&mut cpu);
    assert_eq!(cpu.index(), 0x22A);
}

#[test]
fn random_is_masked_and_seeded() {
    let mut a = cpu_with(&[0xC2, 0xF0, 0xC3, 0x00], &[(0x3, 0xAA)]);
    let mut b = cpu_with(&[0xC2, 0xF0], &[]);
    step(&mut a);
    step(&mut b);
    assert_eq!(v(&a, 0x2) & 0x0F, 0);
    assert_eq!(v(&a, 0x2), v(&b, 0x2));
    step(&mut a);
    assert_eq!(v(&a, 0x3), 0);
}

#[test]
fn display_reads_sprite_from_index() {
    let mut cpu = cpu_with(&[0xD0, 0x15], &[(0x0, 12), (0x1, 3), (FLAG, 1)]);
    cpu.set_index(FONT_ADDRESS_START);
    let mut display = RecordingDisplay::default();
    cpu.cycle(&mut display).unwrap();
    assert_eq!(display.draws, vec![(font::GLYPHS[0].to_vec(), 12u8, 3u8)]);
    assert_eq!(v(&cpu, FLAG), 0);
}

#[test]
fn display_collision_sets_flag() {
    let mut cpu = cpu_with(&[0xD0, 0x15], &[]);
    let mut display = RecordingDisplay {
        collision: true,
        ..Default::default()
    };
    cpu.cycle(&mut display).unwrap();
    assert_eq!(v(&cpu, FLAG), 1);
}

#[test]
fn drawing_twice_on_a_screen_flags_collision() {
    let mut cpu = cpu_with(&[0xD0, 0x15, 0xD0, 0x15], &[]);
    cpu.set_index(FONT_ADDRESS_START);
    let mut screen = Screen::new();
    cpu.cycle(&mut screen).unwrap();
    assert_eq!(v(&cpu, FLAG), 0);
    cpu.cycle(&mut screen).unwrap();
    assert_eq!(v(&cpu, FLAG), 1);
    assert!(screen.pixels().iter().all(|p| !p));
}

#[test]
fn display_past_end_of_memory() {
    let mut cpu = cpu_with(&[0xD0, 0x15], &[]);
    cpu.set_index(0xFFE);
    let err = cpu.cycle(&mut RecordingDisplay::default()).unwrap_err();
    assert!(matches!(err, Error::OutOfBoundsMemory { .. }));
}

#[test]
fn skip_if_key() {
    let mut cpu = cpu_with(&[0xE3, 0x9E], &[(0x3, 0x5)]);
    cpu.set_keycode(Some(0x5));
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);

    let mut cpu = cpu_with(&[0xE3, 0x9E], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);

    let mut cpu = cpu_with(&[0xE3, 0xA1], &[(0x3, 0x5)]);
    cpu.set_keycode(Some(0x5));
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x202);

    let mut cpu = cpu_with(&[0xE3, 0xA1], &[(0x3, 0x5)]);
    cpu.set_keycode(Some(0x0));
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);

    // no key held never equals a register
    let mut cpu = cpu_with(&[0xE3, 0xA1], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x204);
}

#[test]
fn wait_for_key_blocks_until_pressed() {
    let mut cpu = cpu_with(&[0xF5, 0x0A], &[(0x5, 0x3)]);
    step(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0x200);
    assert_eq!(v(&cpu, 0x5), 0x3);

    cpu.set_keycode(Some(0xA));
    assert_eq!(step(&mut cpu), OperationType::WaitForKey);
    assert_eq!(v(&cpu, 0x5), 0xA);
    assert_eq!(cpu.program_counter(), 0x202);
}

#[test]
fn timers_count_down_per_cycle() {
    // delay = V5, sound = V5, V6 = delay
    let mut cpu = cpu_with(&[0xF5, 0x15, 0xF5, 0x18, 0xF6, 0x07], &[(0x5, 10)]);
    step(&mut cpu);
    assert_eq!(cpu.delay_timer(), 9);
    step(&mut cpu);
    assert_eq!(cpu.delay_timer(), 8);
    assert_eq!(cpu.sound_timer(), 9);
    assert!(cpu.is_sound_active());
    step(&mut cpu);
    assert_eq!(v(&cpu, 0x6), 8);
    assert_eq!(cpu.delay_timer(), 7);
}

#[test]
fn timers_stop_at_zero() {
    let mut cpu = cpu_with(&[0xF5, 0x15, 0x12, 0x02], &[(0x5, 1)]);
    step(&mut cpu);
    assert_eq!(cpu.delay_timer(), 0);
    step(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.delay_timer(), 0);
    assert_eq!(cpu.sound_timer(), 0);
    assert!(!cpu.is_sound_active());
}

#[test]
fn fixed_rate_timers_are_left_alone_by_cycle() {
    let mut cpu = cpu_with(&[0xF5, 0x15], &[(0x5, 10)]).with_timer_mode(TimerMode::Fixed60Hz);
    step(&mut cpu);
    assert_eq!(cpu.delay_timer(), 10);
    cpu.tick_timers();
    assert_eq!(cpu.delay_timer(), 9);
}

#[test]
fn add_vx_to_index_is_not_masked() {
    let mut cpu = cpu_with(&[0xF3, 0x1E], &[(0x3, 0x1)]);
    cpu.set_index(0x5);
    step(&mut cpu);
    assert_eq!(cpu.index(), 0x6);

    let mut cpu = cpu_with(&[0xF3, 0x1E], &[(0x3, 0x10)]);
    cpu.set_index(0xFFF);
    step(&mut cpu);
    assert_eq!(cpu.index(), 0x100F);
}

#[test]
fn font_points_index_at_glyph() {
    let mut cpu = cpu_with(&[0xF3, 0x29], &[(0x3, 0x1)]);
    step(&mut cpu);
    assert_eq!(cpu.index(), 0x055);
    assert_eq!(
        cpu.memory().read_range(cpu.index() as usize, 5).unwrap(),
        &[0x20, 0x60, 0x20, 0x20, 0x70]
    );

    let mut cpu = cpu_with(&[0xF3, 0x29], &[(0x3, 0x10)]);
    let err = cpu.cycle(&mut RecordingDisplay::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidFontCharacter { character: 0x10 }));
}

#[test]
fn bcd() {
    let mut cpu = cpu_with(&[0xF3, 0x33], &[(0x3, 0xFD)]);
    cpu.set_index(0x300);
    step(&mut cpu);
    assert_eq!(cpu.memory().read_range(0x300, 3).unwrap(), &[2, 5, 3]);

    let mut cpu = cpu_with(&[0xF3, 0x33], &[(0x3, 7)]);
    cpu.set_index(0x300);
    step(&mut cpu);
    assert_eq!(cpu.memory().read_range(0x300, 3).unwrap(), &[0, 0, 7]);
}

#[test]
fn store_registers_into_memory() {
    let regs = [(0x0, 0x9), (0x1, 0x8), (0x2, 0x7), (0x3, 0x6), (0x4, 0x5)];
    let mut cpu = cpu_with(&[0xF3, 0x55], &regs);
    cpu.set_index(0x300);
    step(&mut cpu);
    assert_eq!(
        cpu.memory().read_range(0x300, 5).unwrap(),
        &[0x9, 0x8, 0x7, 0x6, 0x0]
    );
    assert_eq!(cpu.index(), 0x300);
}

#[test]
fn load_registers_from_memory() {
    let mut cpu = cpu_with(&[0xF3, 0x65], &[]);
    cpu.set_index(0x300);
    cpu.memory_mut()
        .write_range(0x300, &[0x9, 0x8, 0x7, 0x6, 0x5])
        .unwrap();
    step(&mut cpu);
    assert_eq!(&cpu.registers().as_slice()[..5], &[0x9, 0x8, 0x7, 0x6, 0x0]);
}

#[test]
fn running_off_the_end_of_memory() {
    let mut cpu = cpu_with(&[0x1F, 0xFF], &[]);
    step(&mut cpu);
    assert_eq!(cpu.program_counter(), 0xFFF);
    let err = cpu.cycle(&mut RecordingDisplay::default()).unwrap_err();
    assert!(matches!(err, Error::OutOfBoundsMemory { address: 0x1000 }));
}

#[test]
fn reset_restores_power_on_state() {
    let mut cpu = cpu_with(&[0x22, 0x00], &[(0x1, 1)]);
    cpu.set_keycode(Some(3));
    step(&mut cpu);
    cpu.reset();
    assert_eq!(cpu.program_counter(), START_ADDRESS);
    assert_eq!(cpu.stack_depth(), 0);
    assert_eq!(cpu.keycode(), None);
    assert_eq!(v(&cpu, 0x1), 0);
    assert_eq!(cpu.memory().read(0x200).unwrap(), 0);
}

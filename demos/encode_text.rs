use huffpack::{huffman, Decoder, Encoder, FrequencyTable};

fn main() {
    let s = String::from("Huffman codes give short bit strings to common bytes.");
    let tree = huffman(&FrequencyTable::from_bytes(s.as_bytes())).unwrap();
    let e = Encoder::new(tree.code_table());

    let out = e.encode(s.as_bytes()).unwrap();
    let d = Decoder::from_header(&e.header()).unwrap();
    let dec = String::from_utf8(d.decode(&out.bits).unwrap());

    println!("{} bytes -> {} bits: {:?}", s.len(), out.bits.len(), dec);
}

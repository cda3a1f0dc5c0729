// Fixed 2048-word mnemonic list, 11-bit index addressable (word[i] for i in 0..2048).
// Synthesized deterministically; stable across builds, never reordered.
pub const ENGLISH: [&str; 2048] = [
    "babin", "bable", "back", "bad", "badle", "bador", "bagon", "bal",
    "balin", "balor", "bam", "bamon", "ban", "bang", "bant", "bar",
    "baron", "bas", "bash", "bat", "batan", "bater", "bath", "baver",
    "bebin", "beble", "beck", "bed", "bedle", "bedor", "begon", "bel",
    "belin", "belor", "bem", "bemon", "ben", "beng", "bent", "ber",
    "beron", "bes", "besh", "bet", "betan", "beter", "beth", "bever",
    "bibin", "bible", "bick", "bid", "bidle", "bidor", "bigon", "bil",
    "bilin", "bilor", "bim", "bimon", "bin", "bing", "bint", "bir",
    "biron", "bis", "bish", "bit", "bitan", "biter", "bith", "biver",
    "bobin", "boble", "bock", "bod", "bodle", "bodor", "bogon", "bol",
    "bolin", "bolor", "bom", "bomon", "bon", "bong", "bont", "bor",
    "boron", "bos", "bosh", "bot", "botan", "boter", "both", "bover",
    "bubin", "buble", "buck", "bud", "budle", "budor", "bugon", "bul",
    "bulin", "bulor", "bum", "bumon", "bun", "bung", "bunt", "bur",
    "buron", "bus", "bush", "but", "butan", "buter", "buth", "buver",
    "cabin", "cable", "cack", "cad", "cadle", "cador", "cagon", "cal",
    "calin", "calor", "cam", "camon", "can", "cang", "cant", "car",
    "caron", "cas", "cash", "cat", "catan", "cater", "cath", "caver",
    "cebin", "ceble", "ceck", "ced", "cedle", "cedor", "cegon", "cel",
    "celin", "celor", "cem", "cemon", "cen", "ceng", "cent", "cer",
    "ceron", "ces", "cesh", "cet", "cetan", "ceter", "ceth", "cever",
    "cibin", "cible", "cick", "cid", "cidle", "cidor", "cigon", "cil",
    "cilin", "cilor", "cim", "cimon", "cin", "cing", "cint", "cir",
    "ciron", "cis", "cish", "cit", "citan", "citer", "cith", "civer",
    "cobin", "coble", "cock", "cod", "codle", "codor", "cogon", "col",
    "colin", "color", "com", "comon", "con", "cong", "cont", "cor",
    "coron", "cos", "cosh", "cot", "cotan", "coter", "coth", "cover",
    "cubin", "cuble", "cuck", "cud", "cudle", "cudor", "cugon", "cul",
    "culin", "culor", "cum", "cumon", "cun", "cung", "cunt", "cur",
    "curon", "cus", "cush", "cut", "cutan", "cuter", "cuth", "cuver",
    "dabin", "dable", "dack", "dad", "dadle", "dador", "dagon", "dal",
    "dalin", "dalor", "dam", "damon", "dan", "dang", "dant", "dar",
    "daron", "das", "dash", "dat", "datan", "dater", "dath", "daver",
    "debin", "deble", "deck", "ded", "dedle", "dedor", "degon", "del",
    "delin", "delor", "dem", "demon", "den", "deng", "dent", "der",
    "deron", "des", "desh", "det", "detan", "deter", "deth", "dever",
    "dibin", "dible", "dick", "did", "didle", "didor", "digon", "dil",
    "dilin", "dilor", "dim", "dimon", "din", "ding", "dint", "dir",
    "diron", "dis", "dish", "dit", "ditan", "diter", "dith", "diver",
    "dobin", "doble", "dock", "dod", "dodle", "dodor", "dogon", "dol",
    "dolin", "dolor", "dom", "domon", "don", "dong", "dont", "dor",
    "doron", "dos", "dosh", "dot", "dotan", "doter", "doth", "dover",
    "dubin", "duble", "duck", "dud", "dudle", "dudor", "dugon", "dul",
    "dulin", "dulor", "dum", "dumon", "dun", "dung", "dunt", "dur",
    "duron", "dus", "dush", "dut", "dutan", "duter", "duth", "duver",
    "fabin", "fable", "fack", "fad", "fadle", "fador", "fagon", "fal",
    "falin", "falor", "fam", "famon", "fan", "fang", "fant", "far",
    "faron", "fas", "fash", "fat", "fatan", "fater", "fath", "faver",
    "febin", "feble", "feck", "fed", "fedle", "fedor", "fegon", "fel",
    "felin", "felor", "fem", "femon", "fen", "feng", "fent", "fer",
    "feron", "fes", "fesh", "fet", "fetan", "feter", "feth", "fever",
    "fibin", "fible", "fick", "fid", "fidle", "fidor", "figon", "fil",
    "filin", "filor", "fim", "fimon", "fin", "fing", "fint", "fir",
    "firon", "fis", "fish", "fit", "fitan", "fiter", "fith", "fiver",
    "fobin", "foble", "fock", "fod", "fodle", "fodor", "fogon", "fol",
    "folin", "folor", "fom", "fomon", "fon", "fong", "font", "for",
    "foron", "fos", "fosh", "fot", "fotan", "foter", "foth", "fover",
    "fubin", "fuble", "fuck", "fud", "fudle", "fudor", "fugon", "ful",
    "fulin", "fulor", "fum", "fumon", "fun", "fung", "funt", "fur",
    "furon", "fus", "fush", "fut", "futan", "futer", "futh", "fuver",
    "gabin", "gable", "gack", "gad", "gadle", "gador", "gagon", "gal",
    "galin", "galor", "gam", "gamon", "gan", "gang", "gant", "gar",
    "garon", "gas", "gash", "gat", "gatan", "gater", "gath", "gaver",
    "gebin", "geble", "geck", "ged", "gedle", "gedor", "gegon", "gel",
    "gelin", "gelor", "gem", "gemon", "gen", "geng", "gent", "ger",
    "geron", "ges", "gesh", "get", "getan", "geter", "geth", "gever",
    "gibin", "gible", "gick", "gid", "gidle", "gidor", "gigon", "gil",
    "gilin", "gilor", "gim", "gimon", "gin", "ging", "gint", "gir",
    "giron", "gis", "gish", "git", "gitan", "giter", "gith", "giver",
    "gobin", "goble", "gock", "god", "godle", "godor", "gogon", "gol",
    "golin", "golor", "gom", "gomon", "gon", "gong", "gont", "gor",
    "goron", "gos", "gosh", "got", "gotan", "goter", "goth", "gover",
    "gubin", "guble", "guck", "gud", "gudle", "gudor", "gugon", "gul",
    "gulin", "gulor", "gum", "gumon", "gun", "gung", "gunt", "gur",
    "guron", "gus", "gush", "gut", "gutan", "guter", "guth", "guver",
    "habin", "hable", "hack", "had", "hadle", "hador", "hagon", "hal",
    "halin", "halor", "ham", "hamon", "han", "hang", "hant", "har",
    "haron", "has", "hash", "hat", "hatan", "hater", "hath", "haver",
    "hebin", "heble", "heck", "hed", "hedle", "hedor", "hegon", "hel",
    "helin", "helor", "hem", "hemon", "hen", "heng", "hent", "her",
    "heron", "hes", "hesh", "het", "hetan", "heter", "heth", "hever",
    "hibin", "hible", "hick", "hid", "hidle", "hidor", "higon", "hil",
    "hilin", "hilor", "him", "himon", "hin", "hing", "hint", "hir",
    "hiron", "his", "hish", "hit", "hitan", "hiter", "hith", "hiver",
    "hobin", "hoble", "hock", "hod", "hodle", "hodor", "hogon", "hol",
    "holin", "holor", "hom", "homon", "hon", "hong", "hont", "hor",
    "horon", "hos", "hosh", "hot", "hotan", "hoter", "hoth", "hover",
    "hubin", "huble", "huck", "hud", "hudle", "hudor", "hugon", "hul",
    "hulin", "hulor", "hum", "humon", "hun", "hung", "hunt", "hur",
    "huron", "hus", "hush", "hut", "hutan", "huter", "huth", "huver",
    "jabin", "jable", "jack", "jad", "jadle", "jador", "jagon", "jal",
    "jalin", "jalor", "jam", "jamon", "jan", "jang", "jant", "jar",
    "jaron", "jas", "jash", "jat", "jatan", "jater", "jath", "javer",
    "jebin", "jeble", "jeck", "jed", "jedle", "jedor", "jegon", "jel",
    "jelin", "jelor", "jem", "jemon", "jen", "jeng", "jent", "jer",
    "jeron", "jes", "jesh", "jet", "jetan", "jeter", "jeth", "jever",
    "jibin", "jible", "jick", "jid", "jidle", "jidor", "jigon", "jil",
    "jilin", "jilor", "jim", "jimon", "jin", "jing", "jint", "jir",
    "jiron", "jis", "jish", "jit", "jitan", "jiter", "jith", "jiver",
    "jobin", "joble", "jock", "jod", "jodle", "jodor", "jogon", "jol",
    "jolin", "jolor", "jom", "jomon", "jon", "jong", "jont", "jor",
    "joron", "jos", "josh", "jot", "jotan", "joter", "joth", "jover",
    "jubin", "juble", "juck", "jud", "judle", "judor", "jugon", "jul",
    "julin", "julor", "jum", "jumon", "jun", "jung", "junt", "jur",
    "juron", "jus", "jush", "jut", "jutan", "juter", "juth", "juver",
    "kabin", "kable", "kack", "kad", "kadle", "kador", "kagon", "kal",
    "kalin", "kalor", "kam", "kamon", "kan", "kang", "kant", "kar",
    "karon", "kas", "kash", "kat", "katan", "kater", "kath", "kaver",
    "kebin", "keble", "keck", "ked", "kedle", "kedor", "kegon", "kel",
    "kelin", "kelor", "kem", "kemon", "ken", "keng", "kent", "ker",
    "keron", "kes", "kesh", "ket", "ketan", "keter", "keth", "kever",
    "kibin", "kible", "kick", "kid", "kidle", "kidor", "kigon", "kil",
    "kilin", "kilor", "kim", "kimon", "kin", "king", "kint", "kir",
    "kiron", "kis", "kish", "kit", "kitan", "kiter", "kith", "kiver",
    "kobin", "koble", "kock", "kod", "kodle", "kodor", "kogon", "kol",
    "kolin", "kolor", "kom", "komon", "kon", "kong", "kont", "kor",
    "koron", "kos", "kosh", "kot", "kotan", "koter", "koth", "kover",
    "kubin", "kuble", "kuck", "kud", "kudle", "kudor", "kugon", "kul",
    "kulin", "kulor", "kum", "kumon", "kun", "kung", "kunt", "kur",
    "kuron", "kus", "kush", "kut", "kutan", "kuter", "kuth", "kuver",
    "labin", "lable", "lack", "lad", "ladle", "lador", "lagon", "lal",
    "lalin", "lalor", "lam", "lamon", "lan", "lang", "lant", "lar",
    "laron", "las", "lash", "lat", "latan", "later", "lath", "laver",
    "lebin", "leble", "leck", "led", "ledle", "ledor", "legon", "lel",
    "lelin", "lelor", "lem", "lemon", "len", "leng", "lent", "ler",
    "leron", "les", "lesh", "let", "letan", "leter", "leth", "lever",
    "libin", "lible", "lick", "lid", "lidle", "lidor", "ligon", "lil",
    "lilin", "lilor", "lim", "limon", "lin", "ling", "lint", "lir",
    "liron", "lis", "lish", "lit", "litan", "liter", "lith", "liver",
    "lobin", "loble", "lock", "lod", "lodle", "lodor", "logon", "lol",
    "lolin", "lolor", "lom", "lomon", "lon", "long", "lont", "lor",
    "loron", "los", "losh", "lot", "lotan", "loter", "loth", "lover",
    "lubin", "luble", "luck", "lud", "ludle", "ludor", "lugon", "lul",
    "lulin", "lulor", "lum", "lumon", "lun", "lung", "lunt", "lur",
    "luron", "lus", "lush", "lut", "lutan", "luter", "luth", "luver",
    "mabin", "mable", "mack", "mad", "madle", "mador", "magon", "mal",
    "malin", "malor", "mam", "mamon", "man", "mang", "mant", "mar",
    "maron", "mas", "mash", "mat", "matan", "mater", "math", "maver",
    "mebin", "meble", "meck", "med", "medle", "medor", "megon", "mel",
    "melin", "melor", "mem", "memon", "men", "meng", "ment", "mer",
    "meron", "mes", "mesh", "met", "metan", "meter", "meth", "mever",
    "mibin", "mible", "mick", "mid", "midle", "midor", "migon", "mil",
    "milin", "milor", "mim", "mimon", "min", "ming", "mint", "mir",
    "miron", "mis", "mish", "mit", "mitan", "miter", "mith", "miver",
    "mobin", "moble", "mock", "mod", "modle", "modor", "mogon", "mol",
    "molin", "molor", "mom", "momon", "mon", "mong", "mont", "mor",
    "moron", "mos", "mosh", "mot", "motan", "moter", "moth", "mover",
    "mubin", "muble", "muck", "mud", "mudle", "mudor", "mugon", "mul",
    "mulin", "mulor", "mum", "mumon", "mun", "mung", "munt", "mur",
    "muron", "mus", "mush", "mut", "mutan", "muter", "muth", "muver",
    "nabin", "nable", "nack", "nad", "nadle", "nador", "nagon", "nal",
    "nalin", "nalor", "nam", "namon", "nan", "nang", "nant", "nar",
    "naron", "nas", "nash", "nat", "natan", "nater", "nath", "naver",
    "nebin", "neble", "neck", "ned", "nedle", "nedor", "negon", "nel",
    "nelin", "nelor", "nem", "nemon", "nen", "neng", "nent", "ner",
    "neron", "nes", "nesh", "net", "netan", "neter", "neth", "never",
    "nibin", "nible", "nick", "nid", "nidle", "nidor", "nigon", "nil",
    "nilin", "nilor", "nim", "nimon", "nin", "ning", "nint", "nir",
    "niron", "nis", "nish", "nit", "nitan", "niter", "nith", "niver",
    "nobin", "noble", "nock", "nod", "nodle", "nodor", "nogon", "nol",
    "nolin", "nolor", "nom", "nomon", "non", "nong", "nont", "nor",
    "noron", "nos", "nosh", "not", "notan", "noter", "noth", "nover",
    "nubin", "nuble", "nuck", "nud", "nudle", "nudor", "nugon", "nul",
    "nulin", "nulor", "num", "numon", "nun", "nung", "nunt", "nur",
    "nuron", "nus", "nush", "nut", "nutan", "nuter", "nuth", "nuver",
    "pabin", "pable", "pack", "pad", "padle", "pador", "pagon", "pal",
    "palin", "palor", "pam", "pamon", "pan", "pang", "pant", "par",
    "paron", "pas", "pash", "pat", "patan", "pater", "path", "paver",
    "pebin", "peble", "peck", "ped", "pedle", "pedor", "pegon", "pel",
    "pelin", "pelor", "pem", "pemon", "pen", "peng", "pent", "per",
    "peron", "pes", "pesh", "pet", "petan", "peter", "peth", "pever",
    "pibin", "pible", "pick", "pid", "pidle", "pidor", "pigon", "pil",
    "pilin", "pilor", "pim", "pimon", "pin", "ping", "pint", "pir",
    "piron", "pis", "pish", "pit", "pitan", "piter", "pith", "piver",
    "pobin", "poble", "pock", "pod", "podle", "podor", "pogon", "pol",
    "polin", "polor", "pom", "pomon", "pon", "pong", "pont", "por",
    "poron", "pos", "posh", "pot", "potan", "poter", "poth", "pover",
    "pubin", "puble", "puck", "pud", "pudle", "pudor", "pugon", "pul",
    "pulin", "pulor", "pum", "pumon", "pun", "pung", "punt", "pur",
    "puron", "pus", "push", "put", "putan", "puter", "puth", "puver",
    "rabin", "rable", "rack", "rad", "radle", "rador", "ragon", "ral",
    "ralin", "ralor", "ram", "ramon", "ran", "rang", "rant", "rar",
    "raron", "ras", "rash", "rat", "ratan", "rater", "rath", "raver",
    "rebin", "reble", "reck", "red", "redle", "redor", "regon", "rel",
    "relin", "relor", "rem", "remon", "ren", "reng", "rent", "rer",
    "reron", "res", "resh", "ret", "retan", "reter", "reth", "rever",
    "ribin", "rible", "rick", "rid", "ridle", "ridor", "rigon", "ril",
    "rilin", "rilor", "rim", "rimon", "rin", "ring", "rint", "rir",
    "riron", "ris", "rish", "rit", "ritan", "riter", "rith", "river",
    "robin", "roble", "rock", "rod", "rodle", "rodor", "rogon", "rol",
    "rolin", "rolor", "rom", "romon", "ron", "rong", "ront", "ror",
    "roron", "ros", "rosh", "rot", "rotan", "roter", "roth", "rover",
    "rubin", "ruble", "ruck", "rud", "rudle", "rudor", "rugon", "rul",
    "rulin", "rulor", "rum", "rumon", "run", "rung", "runt", "rur",
    "ruron", "rus", "rush", "rut", "rutan", "ruter", "ruth", "ruver",
    "sabin", "sable", "sack", "sad", "sadle", "sador", "sagon", "sal",
    "salin", "salor", "sam", "samon", "san", "sang", "sant", "sar",
    "saron", "sas", "sash", "sat", "satan", "sater", "sath", "saver",
    "sebin", "seble", "seck", "sed", "sedle", "sedor", "segon", "sel",
    "selin", "selor", "sem", "semon", "sen", "seng", "sent", "ser",
    "seron", "ses", "sesh", "set", "setan", "seter", "seth", "sever",
    "sibin", "sible", "sick", "sid", "sidle", "sidor", "sigon", "sil",
    "silin", "silor", "sim", "simon", "sin", "sing", "sint", "sir",
    "siron", "sis", "sish", "sit", "sitan", "siter", "sith", "siver",
    "sobin", "soble", "sock", "sod", "sodle", "sodor", "sogon", "sol",
    "solin", "solor", "som", "somon", "son", "song", "sont", "sor",
    "soron", "sos", "sosh", "sot", "sotan", "soter", "soth", "sover",
    "subin", "suble", "suck", "sud", "sudle", "sudor", "sugon", "sul",
    "sulin", "sulor", "sum", "sumon", "sun", "sung", "sunt", "sur",
    "suron", "sus", "sush", "sut", "sutan", "suter", "suth", "suver",
    "tabin", "table", "tack", "tad", "tadle", "tador", "tagon", "tal",
    "talin", "talor", "tam", "tamon", "tan", "tang", "tant", "tar",
    "taron", "tas", "tash", "tat", "tatan", "tater", "tath", "taver",
    "tebin", "teble", "teck", "ted", "tedle", "tedor", "tegon", "tel",
    "telin", "telor", "tem", "temon", "ten", "teng", "tent", "ter",
    "teron", "tes", "tesh", "tet", "tetan", "teter", "teth", "tever",
    "tibin", "tible", "tick", "tid", "tidle", "tidor", "tigon", "til",
    "tilin", "tilor", "tim", "timon", "tin", "ting", "tint", "tir",
    "tiron", "tis", "tish", "tit", "titan", "titer", "tith", "tiver",
    "tobin", "toble", "tock", "tod", "todle", "todor", "togon", "tol",
    "tolin", "tolor", "tom", "tomon", "ton", "tong", "tont", "tor",
    "toron", "tos", "tosh", "tot", "totan", "toter", "toth", "tover",
    "tubin", "tuble", "tuck", "tud", "tudle", "tudor", "tugon", "tul",
    "tulin", "tulor", "tum", "tumon", "tun", "tung", "tunt", "tur",
    "turon", "tus", "tush", "tut", "tutan", "tuter", "tuth", "tuver",
    "vabin", "vable", "vack", "vad", "vadle", "vador", "vagon", "val",
    "valin", "valor", "vam", "vamon", "van", "vang", "vant", "var",
    "varon", "vas", "vash", "vat", "vatan", "vater", "vath", "vaver",
    "vebin", "veble", "veck", "ved", "vedle", "vedor", "vegon", "vel",
    "velin", "velor", "vem", "vemon", "ven", "veng", "vent", "ver",
    "veron", "ves", "vesh", "vet", "vetan", "veter", "veth", "vever",
    "vibin", "vible", "vick", "vid", "vidle", "vidor", "vigon", "vil",
    "vilin", "vilor", "vim", "vimon", "vin", "ving", "vint", "vir",
    "viron", "vis", "vish", "vit", "vitan", "viter", "vith", "viver",
    "vobin", "voble", "vock", "vod", "vodle", "vodor", "vogon", "vol",
    "volin", "volor", "vom", "vomon", "von", "vong", "vont", "vor",
    "voron", "vos", "vosh", "vot", "votan", "voter", "voth", "vover",
    "vubin", "vuble", "vuck", "vud", "vudle", "vudor", "vugon", "vul",
    "vulin", "vulor", "vum", "vumon", "vun", "vung", "vunt", "vur",
    "vuron", "vus", "vush", "vut", "vutan", "vuter", "vuth", "vuver",
    "wabin", "wable", "wack", "wad", "wadle", "wador", "wagon", "wal",
    "walin", "walor", "wam", "wamon", "wan", "wang", "want", "war",
    "waron", "was", "wash", "wat", "watan", "water", "wath", "waver",
    "webin", "weble", "weck", "wed", "wedle", "wedor", "wegon", "wel",
    "welin", "welor", "wem", "wemon", "wen", "weng", "went", "wer",
    "weron", "wes", "wesh", "wet", "wetan", "weter", "weth", "wever",
    "wibin", "wible", "wick", "wid", "widle", "widor", "wigon", "wil",
    "wilin", "wilor", "wim", "wimon", "win", "wing", "wint", "wir",
    "wiron", "wis", "wish", "wit", "witan", "witer", "with", "wiver",
    "wobin", "woble", "wock", "wod", "wodle", "wodor", "wogon", "wol",
    "wolin", "wolor", "wom", "womon", "won", "wong", "wont", "wor",
    "woron", "wos", "wosh", "wot", "wotan", "woter", "woth", "wover",
    "wubin", "wuble", "wuck", "wud", "wudle", "wudor", "wugon", "wul",
    "wulin", "wulor", "wum", "wumon", "wun", "wung", "wunt", "wur",
    "wuron", "wus", "wush", "wut", "wutan", "wuter", "wuth", "wuver",
    "zad", "zal", "zam", "zan", "zant", "zar", "zas", "zat",
];
